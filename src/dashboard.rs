//! Dashboard Content
//!
//! Static data behind the dashboard widgets: indicator cards, the three
//! charts and the "New Users" table.

use serde::{Deserialize, Serialize};

use crate::chart::{ChartData, PieData, Series};
use crate::table::{locale_string, Align, CellValue, Column, FilterOption, TableEngine, TableRow};

pub const NEW_USERS_TITLE: &str = "New Users";
pub const NEW_USERS_PAGE_SIZE: usize = 5;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Small KPI card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorCard {
    pub icon: &'static str,
    pub title: &'static str,
    pub value: &'static str,
    pub caption: &'static str,
    pub change: &'static str,
    pub is_positive: bool,
}

pub fn indicator_cards() -> Vec<IndicatorCard> {
    vec![
        IndicatorCard {
            icon: "users",
            title: "Total Users",
            value: "1,234",
            caption: "Feb1 - Today",
            change: "12%",
            is_positive: true,
        },
        IndicatorCard {
            icon: "chart-line",
            title: "Active Sessions",
            value: "$23,456",
            caption: "Feb1 - Today",
            change: "80%",
            is_positive: true,
        },
        IndicatorCard {
            icon: "shopping-cart",
            title: "Sales Revenue",
            value: "320",
            caption: "Feb1 - Today",
            change: "13%",
            is_positive: false,
        },
    ]
}

/// Headline figure above a chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartHeadline {
    pub title: &'static str,
    pub value: Option<&'static str>,
    pub change: Option<&'static str>,
}

pub const USER_GROWTH_HEADLINE: ChartHeadline = ChartHeadline {
    title: "User Growth",
    value: None,
    change: None,
};

pub const DISTRIBUTION_HEADLINE: ChartHeadline = ChartHeadline {
    title: "Distribution",
    value: Some("13,567"),
    change: Some("25%"),
};

pub const SALES_TRENDS_HEADLINE: ChartHeadline = ChartHeadline {
    title: "Sales Trends",
    value: Some("$10,567"),
    change: Some("25%"),
};

/// Monthly new users (bar chart)
pub fn user_growth() -> ChartData {
    ChartData::new(
        &MONTHS,
        vec![Series::new(
            "New Users",
            vec![
                200.0, 450.0, 300.0, 500.0, 700.0, 850.0, 950.0, 900.0, 870.0, 920.0, 980.0,
                1000.0,
            ],
            "rgba(173, 216, 230, 1)",
        )
        .with_fill("rgba(173, 216, 230, 0.6)")],
    )
}

/// Year-over-year sales (line chart)
pub fn sales_trends() -> ChartData {
    ChartData::new(
        &MONTHS[..5],
        vec![
            Series::new(
                "2024 Sales",
                vec![120.0, 150.0, 140.0, 180.0, 200.0],
                "rgba(54, 162, 235, 1)",
            )
            .with_fill("rgba(54, 162, 235, 0.2)"),
            Series::new(
                "2023 Sales",
                vec![100.0, 120.0, 130.0, 150.0, 170.0],
                "rgb(255, 180, 99)",
            )
            .with_fill("rgba(255, 99, 132, 0.2)"),
        ],
    )
}

/// Sales by category (donut chart)
pub fn category_distribution() -> PieData {
    PieData::new(&["Clothes", "Rice", "Meat"], vec![40.0, 30.0, 30.0])
}

/// Row of the "New Users" table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUserRow {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub age: u32,
    pub city: String,
}

impl TableRow for NewUserRow {
    fn cell(&self, column_id: &str) -> CellValue {
        match column_id {
            "id" => CellValue::from(self.id),
            "name" => CellValue::from(self.name.as_str()),
            "email" => CellValue::from(self.email.as_str()),
            "age" => CellValue::from(self.age),
            "city" => CellValue::from(self.city.as_str()),
            _ => CellValue::Empty,
        }
    }
}

pub fn new_users_columns() -> Vec<Column> {
    let ages = [24, 27, 29, 30, 38, 50];
    let cities = [
        "New York",
        "Los Angeles",
        "Houston",
        "Phoenix",
        "San Diego",
        "Chicago",
    ];

    vec![
        Column::new("id", "ID").min_width(50).align(Align::Center),
        Column::new("name", "Name").min_width(170),
        Column::new("email", "Email").min_width(200),
        Column::new("age", "Age")
            .min_width(100)
            .align(Align::Right)
            .format(locale_string)
            .filter_options(
                ages.iter()
                    .map(|a| FilterOption::new(a.to_string(), format!("Age {}", a)))
                    .collect(),
            ),
        Column::new("city", "City")
            .min_width(150)
            .filter_options(cities.iter().map(|c| FilterOption::plain(*c)).collect()),
    ]
}

pub fn new_users_rows() -> Vec<NewUserRow> {
    let people = [
        ("John Doe", 30, "New York"),
        ("Jane Smith", 24, "Los Angeles"),
        ("Alice Brown", 29, "Houston"),
        ("Bob White", 38, "Phoenix"),
        ("Eve Adams", 50, "San Diego"),
        ("Tom Green", 27, "Chicago"),
        ("Alice Brown", 29, "Houston"),
        ("Bob White", 38, "Phoenix"),
        ("Eve Adams", 50, "San Diego"),
        ("Tom Green", 27, "Chicago"),
    ];

    people
        .iter()
        .zip(1u32..)
        .map(|((name, age, city), id)| NewUserRow {
            id,
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            age: *age,
            city: city.to_string(),
        })
        .collect()
}

pub fn new_users_table() -> TableEngine<NewUserRow> {
    TableEngine::new(new_users_rows(), new_users_columns(), NEW_USERS_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableBody;

    #[test]
    fn test_new_users_rows() {
        let rows = new_users_rows();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].email, "john.doe@example.com");
        assert_eq!(rows[9].id, 10);
        assert_eq!(rows[9].city, "Chicago");
    }

    #[test]
    fn test_chicago_filter_on_new_users() {
        let mut table = new_users_table();
        table.open_filter_editor();
        assert_eq!(table.expanded_category(), Some("age"));
        table.toggle_filter_value("city", "Chicago", true);
        table.apply_filters();

        let ids: Vec<u32> = table.visible_rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![6, 10]);
        assert_eq!(table.range_label(), "1\u{2013}2 of 2");

        table.set_page(1);
        assert!(table.visible_rows().is_empty());
    }

    #[test]
    fn test_age_filter_matches_numeric_cells() {
        let mut table = new_users_table();
        table.open_filter_editor();
        table.toggle_filter_value("age", "50", true);
        table.apply_filters();

        assert_eq!(table.filtered_count(), 2);
        let chips = table.active_chips();
        assert_eq!(chips[0].label, "Age: 50");
    }

    #[test]
    fn test_first_page_rendering() {
        let table = new_users_table();
        let TableBody::Rows(rows) = table.body() else {
            panic!("expected rows");
        };
        assert_eq!(
            rows[1],
            vec!["2", "Jane Smith", "jane.smith@example.com", "24", "Los Angeles"]
        );
    }

    #[test]
    fn test_widget_data() {
        assert_eq!(indicator_cards().len(), 3);
        assert!(!indicator_cards()[2].is_positive);
        assert_eq!(user_growth().labels.len(), 12);
        assert_eq!(user_growth().max_value(), 1000.0);
        assert_eq!(sales_trends().labels, vec!["Jan", "Feb", "Mar", "Apr", "May"]);
        assert_eq!(category_distribution().slices()[0].caption(), "Clothes: 40%");
    }
}
