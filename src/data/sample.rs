//! Synthetic M5-style retail dataset generation.
//!
//! Produces the three raw input tables with the same layout as the real files:
//!
//! - calendar: `date, wm_yr_wk, d, event_name_1, event_type_1, event_name_2, event_type_2, snap_CA`
//! - sales: `id, item_id, dept_id, cat_id, store_id, state_id, d_1..d_n`
//! - prices: `store_id, item_id, wm_yr_wk, sell_price`
//!
//! Daily unit sales are Poisson draws around a per-item level with a weekly
//! shape, a lift on SNAP days, and a closed store on Christmas. Everything is
//! driven by a seeded `StdRng`, so the same config always yields the same data.

use chrono::{Datelike, Duration, NaiveDate};
use polars::prelude::{Column, DataFrame};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Normal, Poisson};

use crate::domain::{schema, Dataset};
use crate::error::AppError;

/// Departments cycled through when naming items.
const DEPARTMENTS: [(&str, &str); 3] = [
    ("HOBBIES_1", "HOBBIES"),
    ("FOODS_1", "FOODS"),
    ("HOUSEHOLD_1", "HOUSEHOLD"),
];

/// Demand multiplier by weekday (Monday first); weekends sell more.
const WEEKLY_SHAPE: [f64; 7] = [0.9, 0.85, 0.85, 0.9, 1.05, 1.25, 1.2];

/// Demand multiplier on SNAP days.
const SNAP_LIFT: f64 = 1.15;

/// Fixed-date events as `(month, day, name, type)`.
const EVENTS: [(u32, u32, &str, &str); 5] = [
    (1, 1, "NewYear", "National"),
    (2, 14, "ValentinesDay", "Cultural"),
    (7, 4, "IndependenceDay", "National"),
    (10, 31, "Halloween", "Cultural"),
    (12, 25, "Christmas", "National"),
];

#[derive(Debug, Clone)]
pub struct SampleConfig {
    /// Number of calendar days (and `d_` columns).
    pub days: usize,
    /// Number of items (sales rows).
    pub items: usize,
    pub store_id: String,
    pub start: NaiveDate,
    pub seed: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            days: 365,
            items: 10,
            store_id: "CA_1".to_string(),
            start: NaiveDate::from_ymd_opt(2011, 1, 29).unwrap_or_default(),
            seed: 42,
        }
    }
}

/// Generate calendar, sales and price tables for `config`.
pub fn generate_dataset(config: &SampleConfig) -> Result<Dataset, AppError> {
    if config.days == 0 {
        return Err(AppError::new(2, "Sample days must be > 0."));
    }
    if config.items == 0 {
        return Err(AppError::new(2, "Sample items must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let dates: Vec<NaiveDate> = (0..config.days)
        .map(|i| config.start + Duration::days(i as i64))
        .collect();

    let calendar = build_calendar(&dates)?;
    let sales = build_sales(config, &dates, &mut rng)?;
    let prices = build_prices(config, &dates, &mut rng)?;

    Ok(Dataset {
        calendar,
        sales,
        prices: Some(prices),
    })
}

/// `wm_yr_wk` of the `day`-th calendar day: weeks counted from the start.
fn week_id(day: usize) -> i64 {
    11101 + (day / 7) as i64
}

fn event_on(date: NaiveDate) -> Option<(&'static str, &'static str)> {
    EVENTS
        .iter()
        .find(|(m, d, _, _)| date.month() == *m && date.day() == *d)
        .map(|&(_, _, name, kind)| (name, kind))
}

fn is_snap(date: NaiveDate) -> bool {
    date.day() <= 10
}

fn item_id(index: usize) -> String {
    let (dept, _) = DEPARTMENTS[index % DEPARTMENTS.len()];
    format!("{dept}_{:03}", index / DEPARTMENTS.len() + 1)
}

fn frame(columns: Vec<Column>) -> Result<DataFrame, AppError> {
    DataFrame::new(columns)
        .map_err(|e| AppError::new(4, format!("Failed to assemble sample table: {e}")))
}

fn build_calendar(dates: &[NaiveDate]) -> Result<DataFrame, AppError> {
    let events: Vec<Option<(&str, &str)>> = dates.iter().map(|&d| event_on(d)).collect();
    let names: Vec<Option<&str>> = events.iter().map(|e| e.map(|(name, _)| name)).collect();
    let kinds: Vec<Option<&str>> = events.iter().map(|e| e.map(|(_, kind)| kind)).collect();
    let none = vec![None::<&str>; dates.len()];

    frame(vec![
        Column::new(
            schema::DATE.into(),
            dates
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "wm_yr_wk".into(),
            (0..dates.len()).map(week_id).collect::<Vec<_>>(),
        ),
        Column::new(
            schema::DAY.into(),
            (1..=dates.len()).map(|i| format!("d_{i}")).collect::<Vec<_>>(),
        ),
        Column::new(schema::EVENT_COLUMNS[0].into(), names),
        Column::new(schema::EVENT_COLUMNS[1].into(), kinds),
        Column::new(schema::EVENT_COLUMNS[2].into(), none.clone()),
        Column::new(schema::EVENT_COLUMNS[3].into(), none),
        Column::new(
            "snap_CA".into(),
            dates.iter().map(|&d| i64::from(is_snap(d))).collect::<Vec<_>>(),
        ),
    ])
}

fn build_sales(
    config: &SampleConfig,
    dates: &[NaiveDate],
    rng: &mut StdRng,
) -> Result<DataFrame, AppError> {
    let n = config.items;
    let state = config
        .store_id
        .split('_')
        .next()
        .unwrap_or(&config.store_id)
        .to_string();

    let item_ids: Vec<String> = (0..n).map(item_id).collect();
    let department = |i: usize| DEPARTMENTS[i % DEPARTMENTS.len()];
    let mut columns = vec![
        Column::new(
            schema::ITEM_ID.into(),
            item_ids
                .iter()
                .map(|item| format!("{item}_{}_validation", config.store_id))
                .collect::<Vec<_>>(),
        ),
        Column::new("item_id".into(), item_ids.clone()),
        Column::new(
            schema::DEPT_ID.into(),
            (0..n).map(|i| department(i).0).collect::<Vec<_>>(),
        ),
        Column::new(
            "cat_id".into(),
            (0..n).map(|i| department(i).1).collect::<Vec<_>>(),
        ),
        Column::new(schema::STORE_ID.into(), vec![config.store_id.as_str(); n]),
        Column::new("state_id".into(), vec![state.as_str(); n]),
    ];

    // Per-item demand level; a few slow movers like the real data.
    let levels: Vec<f64> = (0..n).map(|_| rng.gen_range(0.3..6.0)).collect();

    let mut units: Vec<Vec<i64>> = vec![Vec::with_capacity(n); dates.len()];
    for &level in &levels {
        for (day, date) in dates.iter().enumerate() {
            let closed = matches!(event_on(*date), Some(("Christmas", _)));
            let mut rate = level * WEEKLY_SHAPE[date.weekday().num_days_from_monday() as usize];
            if is_snap(*date) {
                rate *= SNAP_LIFT;
            }
            let sold = if closed {
                0
            } else {
                let poisson = Poisson::new(rate)
                    .map_err(|e| AppError::new(4, format!("Demand distribution error: {e}")))?;
                poisson.sample(rng) as i64
            };
            units[day].push(sold);
        }
    }

    columns.extend(
        units
            .into_iter()
            .enumerate()
            .map(|(day, values)| Column::new(format!("d_{}", day + 1).into(), values)),
    );
    frame(columns)
}

fn build_prices(
    config: &SampleConfig,
    dates: &[NaiveDate],
    rng: &mut StdRng,
) -> Result<DataFrame, AppError> {
    let weeks = (dates.len() - 1) / 7 + 1;
    let noise = Normal::new(0.0, 0.02)
        .map_err(|e| AppError::new(4, format!("Price distribution error: {e}")))?;

    let mut stores = Vec::new();
    let mut items = Vec::new();
    let mut week_ids = Vec::new();
    let mut prices = Vec::new();
    for index in 0..config.items {
        let base: f64 = rng.gen_range(0.5..20.0);
        for week in 0..weeks {
            let price = (base * (1.0 + noise.sample(rng))).max(0.01);
            stores.push(config.store_id.clone());
            items.push(item_id(index));
            week_ids.push(week_id(week * 7));
            prices.push((price * 100.0).round() / 100.0);
        }
    }

    frame(vec![
        Column::new(schema::STORE_ID.into(), stores),
        Column::new("item_id".into(), items),
        Column::new("wm_yr_wk".into(), week_ids),
        Column::new("sell_price".into(), prices),
    ])
}
