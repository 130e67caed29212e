pub mod chart_spec;
pub mod day_of_year;
pub mod exceedance;
pub mod month_day;
pub mod output_format;
pub mod product;
pub mod reach;
pub mod series;
pub mod table;
pub mod thresholds;
