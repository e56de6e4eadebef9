//! Derived View Computations
//!
//! Pure functions turning the raw rental/item collections into the
//! statistics, rankings and slices the dashboard renders. Stateless and
//! re-run on every input change; callers memoize.

use chrono::{DateTime, Datelike, Utc};

use crate::config::PAGE_SIZE;
use crate::models::{Item, Rental, RentalStatus};

// ========================
// Stock Status
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    Available,
    Unavailable,
}

impl StockStatus {
    pub fn label(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of stock",
            StockStatus::LowStock => "Low stock",
            StockStatus::Available => "Available",
            StockStatus::Unavailable => "Not for loan",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "stock-badge out",
            StockStatus::LowStock => "stock-badge low",
            StockStatus::Available => "stock-badge ok",
            StockStatus::Unavailable => "stock-badge held",
        }
    }
}

/// Low-stock threshold is a fifth of capacity. The `available` flag only
/// matters once there is meaningful stock.
pub fn stock_status(item: &Item) -> StockStatus {
    if item.stock == 0 {
        StockStatus::OutOfStock
    } else if item.stock as f64 <= item.total_stock as f64 * 0.2 {
        StockStatus::LowStock
    } else if item.available {
        StockStatus::Available
    } else {
        StockStatus::Unavailable
    }
}

// ========================
// Dashboard Counters
// ========================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub ongoing: usize,
    pub available_items: usize,
    pub today_rentals: usize,
    pub overdue: usize,
}

pub fn dashboard_stats(rentals: &[Rental], items: &[Item], now: DateTime<Utc>) -> DashboardStats {
    DashboardStats {
        ongoing: rentals
            .iter()
            .filter(|r| r.status == RentalStatus::Ongoing)
            .count(),
        available_items: items.iter().filter(|i| i.available && i.stock > 0).count(),
        today_rentals: rentals
            .iter()
            .filter(|r| r.rental_date.date_naive() == now.date_naive())
            .count(),
        overdue: rentals
            .iter()
            .filter(|r| r.status == RentalStatus::Overdue)
            .count(),
    }
}

// ========================
// Popularity Ranking
// ========================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularItem {
    pub rank: usize,
    pub name: String,
    pub count: usize,
}

/// Top 5 item names by rental count. Ties keep first-encountered order; the
/// stable sort preserves the insertion sequence built up below.
pub fn popular_items(rentals: &[Rental]) -> Vec<PopularItem> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for rental in rentals {
        match counts
            .iter_mut()
            .find(|(name, _)| *name == rental.item_name)
        {
            Some((_, count)) => *count += 1,
            None => counts.push((&rental.item_name, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(5)
        .enumerate()
        .map(|(index, (name, count))| PopularItem {
            rank: index + 1,
            name: name.to_string(),
            count,
        })
        .collect()
}

// ========================
// Recent Activity
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Rented,
    Returned,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    pub rental_id: u32,
    pub kind: ActivityKind,
    pub item_name: String,
    pub renter_name: String,
    pub at: DateTime<Utc>,
}

/// The 5 most recent starts and 5 most recent returns, merged and re-sorted
/// by event time, newest first, capped at 10.
pub fn recent_activity(rentals: &[Rental]) -> Vec<ActivityEntry> {
    let mut started: Vec<&Rental> = rentals
        .iter()
        .filter(|r| r.status == RentalStatus::Ongoing)
        .collect();
    started.sort_by(|a, b| b.rental_date.cmp(&a.rental_date));

    let mut closed: Vec<&Rental> = rentals
        .iter()
        .filter(|r| r.status == RentalStatus::Completed && r.return_date.is_some())
        .collect();
    closed.sort_by(|a, b| b.return_date.cmp(&a.return_date));

    let mut feed: Vec<ActivityEntry> = started
        .into_iter()
        .take(5)
        .map(|r| ActivityEntry {
            rental_id: r.id,
            kind: ActivityKind::Rented,
            item_name: r.item_name.clone(),
            renter_name: r.renter_name.clone(),
            at: r.rental_date,
        })
        .collect();
    feed.extend(closed.into_iter().take(5).filter_map(|r| {
        r.return_date.map(|at| ActivityEntry {
            rental_id: r.id,
            kind: ActivityKind::Returned,
            item_name: r.item_name.clone(),
            renter_name: r.renter_name.clone(),
            at,
        })
    }));
    feed.sort_by(|a, b| b.at.cmp(&a.at));
    feed.truncate(10);
    feed
}

// ========================
// Monthly Aggregation
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlyBucket {
    pub year: i32,
    /// 1-based calendar month.
    pub month: u32,
    pub rentals: usize,
    pub returns: usize,
}

impl MonthlyBucket {
    pub fn label(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Twelve calendar-month buckets ending at `now`'s month, oldest first.
/// Start dates bump `rentals`, return dates bump `returns`; anything outside
/// the window is dropped.
pub fn monthly_totals(rentals: &[Rental], now: DateTime<Utc>) -> Vec<MonthlyBucket> {
    let mut buckets: Vec<MonthlyBucket> = (0..12u32)
        .rev()
        .map(|back| {
            let (year, month) = months_back(now.year(), now.month(), back);
            MonthlyBucket {
                year,
                month,
                rentals: 0,
                returns: 0,
            }
        })
        .collect();

    for rental in rentals {
        if let Some(bucket) = bucket_for(&mut buckets, rental.rental_date) {
            bucket.rentals += 1;
        }
        if let Some(returned) = rental.return_date {
            if let Some(bucket) = bucket_for(&mut buckets, returned) {
                bucket.returns += 1;
            }
        }
    }
    buckets
}

fn months_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - back as i32;
    (index.div_euclid(12), (index.rem_euclid(12) + 1) as u32)
}

fn bucket_for(buckets: &mut [MonthlyBucket], at: DateTime<Utc>) -> Option<&mut MonthlyBucket> {
    buckets
        .iter_mut()
        .find(|b| b.year == at.year() && b.month == at.month())
}

// ========================
// Filtering & Pagination
// ========================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RentalStatus),
}

impl StatusFilter {
    pub fn matches(self, status: RentalStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }

    /// Value used by the status dropdown.
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "ALL",
            StatusFilter::Only(status) => status.as_query(),
        }
    }

    pub fn parse(value: &str) -> StatusFilter {
        match value {
            "ONGOING" => StatusFilter::Only(RentalStatus::Ongoing),
            "COMPLETED" => StatusFilter::Only(RentalStatus::Completed),
            "OVERDUE" => StatusFilter::Only(RentalStatus::Overdue),
            _ => StatusFilter::All,
        }
    }
}

/// Status match AND case-insensitive substring match against item or renter
/// name.
pub fn filter_rentals(rentals: &[Rental], status: StatusFilter, search: &str) -> Vec<Rental> {
    let needle = search.to_lowercase();
    rentals
        .iter()
        .filter(|r| {
            status.matches(r.status)
                && (needle.is_empty()
                    || r.item_name.to_lowercase().contains(&needle)
                    || r.renter_name.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

pub fn total_pages(filtered: usize) -> usize {
    filtered.div_ceil(PAGE_SIZE)
}

/// Records of a 1-based page. Pages past the end come back empty; callers
/// re-clamp their stored page with [`clamp_page`] after a filter change.
pub fn page_slice<T: Clone>(records: &[T], page: usize) -> Vec<T> {
    let start = page.saturating_sub(1) * PAGE_SIZE;
    records.iter().skip(start).take(PAGE_SIZE).cloned().collect()
}

/// Clamps into `1..=total`; an empty result set pins the page to 1.
pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total.max(1))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn item(id: u32, stock: u32, total_stock: u32, available: bool) -> Item {
        Item {
            id,
            name: format!("Item {id}"),
            category: "General".to_string(),
            description: String::new(),
            available,
            stock,
            total_stock,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn rental(id: u32, item_name: &str, status: RentalStatus, rented: &str) -> Rental {
        Rental {
            id,
            item_id: id,
            item_name: item_name.to_string(),
            renter_name: format!("Renter {id}"),
            renter_contact: String::new(),
            status,
            rental_date: parse(rented),
            expected_return_date: parse(rented),
            return_date: None,
            notes: None,
        }
    }

    fn returned(mut r: Rental, at: &str) -> Rental {
        r.status = RentalStatus::Completed;
        r.return_date = Some(parse(at));
        r
    }

    fn parse(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .expect("valid RFC 3339 fixture")
            .with_timezone(&Utc)
    }

    #[test]
    fn test_stock_status_quadrants() {
        assert_eq!(stock_status(&item(1, 0, 10, true)), StockStatus::OutOfStock);
        assert_eq!(stock_status(&item(2, 1, 10, true)), StockStatus::LowStock);
        assert_eq!(stock_status(&item(3, 2, 10, true)), StockStatus::LowStock);
        assert_eq!(stock_status(&item(4, 3, 10, true)), StockStatus::Available);
        assert_eq!(
            stock_status(&item(5, 3, 10, false)),
            StockStatus::Unavailable
        );
    }

    #[test]
    fn test_popularity_ranking_is_stable() {
        let rentals = vec![
            rental(1, "A", RentalStatus::Ongoing, "2026-07-01T10:00:00Z"),
            rental(2, "A", RentalStatus::Ongoing, "2026-07-02T10:00:00Z"),
            rental(3, "B", RentalStatus::Ongoing, "2026-07-03T10:00:00Z"),
            rental(4, "B", RentalStatus::Ongoing, "2026-07-04T10:00:00Z"),
            rental(5, "B", RentalStatus::Ongoing, "2026-07-05T10:00:00Z"),
            rental(6, "C", RentalStatus::Ongoing, "2026-07-06T10:00:00Z"),
        ];
        let ranking = popular_items(&rentals);
        assert_eq!(ranking.len(), 3);
        assert_eq!((ranking[0].rank, ranking[0].name.as_str(), ranking[0].count), (1, "B", 3));
        assert_eq!((ranking[1].rank, ranking[1].name.as_str(), ranking[1].count), (2, "A", 2));
        assert_eq!((ranking[2].rank, ranking[2].name.as_str(), ranking[2].count), (3, "C", 1));
    }

    #[test]
    fn test_popularity_tie_break_keeps_first_encountered_order() {
        let rentals = vec![
            rental(1, "X", RentalStatus::Ongoing, "2026-07-01T10:00:00Z"),
            rental(2, "Y", RentalStatus::Ongoing, "2026-07-02T10:00:00Z"),
            rental(3, "X", RentalStatus::Ongoing, "2026-07-03T10:00:00Z"),
            rental(4, "Y", RentalStatus::Ongoing, "2026-07-04T10:00:00Z"),
        ];
        let ranking = popular_items(&rentals);
        assert_eq!(ranking[0].name, "X");
        assert_eq!(ranking[1].name, "Y");
    }

    #[test]
    fn test_popularity_caps_at_five() {
        let mut rentals = Vec::new();
        for (i, name) in ["A", "B", "C", "D", "E", "F", "G"].iter().enumerate() {
            rentals.push(rental(i as u32, name, RentalStatus::Ongoing, "2026-07-01T10:00:00Z"));
        }
        assert_eq!(popular_items(&rentals).len(), 5);
    }

    #[test]
    fn test_recent_activity_merges_and_caps() {
        let mut rentals = Vec::new();
        // Seven ongoing rentals, one per day; only the five newest qualify.
        for day in 1..=7 {
            rentals.push(rental(
                day,
                "A",
                RentalStatus::Ongoing,
                &format!("2026-07-{day:02}T10:00:00Z"),
            ));
        }
        // Seven completed rentals returned on later days.
        for day in 1..=7 {
            let r = rental(
                100 + day,
                "B",
                RentalStatus::Ongoing,
                &format!("2026-06-{day:02}T10:00:00Z"),
            );
            rentals.push(returned(r, &format!("2026-07-{:02}T12:00:00Z", day + 10)));
        }

        let feed = recent_activity(&rentals);
        assert_eq!(feed.len(), 10);
        // Newest first across both kinds: returns on Jul 13..17 interleave
        // with starts on Jul 3..7.
        assert!(feed.windows(2).all(|pair| pair[0].at >= pair[1].at));
        assert_eq!(feed[0].kind, ActivityKind::Returned);
        assert_eq!(feed[0].at, parse("2026-07-17T12:00:00Z"));
        assert!(feed.iter().any(|e| e.kind == ActivityKind::Rented));
    }

    #[test]
    fn test_recent_activity_ignores_completed_without_return_date() {
        let mut no_date = rental(1, "A", RentalStatus::Ongoing, "2026-07-01T10:00:00Z");
        no_date.status = RentalStatus::Completed;
        assert!(recent_activity(&[no_date]).is_empty());
    }

    #[test]
    fn test_monthly_totals_current_month_and_window_edge() {
        let now = parse("2026-08-06T12:00:00Z");
        let in_month = returned(
            rental(1, "A", RentalStatus::Ongoing, "2026-08-02T10:00:00Z"),
            "2026-08-04T10:00:00Z",
        );
        // Thirteen months back: outside the window entirely.
        let too_old = rental(2, "B", RentalStatus::Ongoing, "2025-07-15T10:00:00Z");

        let buckets = monthly_totals(&[in_month, too_old], now);
        assert_eq!(buckets.len(), 12);
        assert_eq!((buckets[0].year, buckets[0].month), (2025, 9));
        assert_eq!((buckets[11].year, buckets[11].month), (2026, 8));
        assert_eq!(buckets[11].rentals, 1);
        assert_eq!(buckets[11].returns, 1);
        let total: usize = buckets.iter().map(|b| b.rentals + b.returns).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_monthly_totals_splits_start_and_return_months() {
        let now = parse("2026-08-06T12:00:00Z");
        let spanning = returned(
            rental(1, "A", RentalStatus::Ongoing, "2026-06-20T10:00:00Z"),
            "2026-07-02T10:00:00Z",
        );
        let buckets = monthly_totals(&[spanning], now);
        let june = buckets.iter().find(|b| b.month == 6).expect("june bucket");
        let july = buckets.iter().find(|b| b.month == 7).expect("july bucket");
        assert_eq!((june.rentals, june.returns), (1, 0));
        assert_eq!((july.rentals, july.returns), (0, 1));
    }

    #[test]
    fn test_dashboard_stats_counts() {
        let now = parse("2026-08-06T12:00:00Z");
        let rentals = vec![
            rental(1, "A", RentalStatus::Ongoing, "2026-08-06T09:00:00Z"),
            rental(2, "B", RentalStatus::Overdue, "2026-07-01T09:00:00Z"),
            returned(
                rental(3, "C", RentalStatus::Ongoing, "2026-08-01T09:00:00Z"),
                "2026-08-03T09:00:00Z",
            ),
        ];
        let items = vec![
            item(1, 3, 10, true),
            item(2, 0, 10, true),
            item(3, 5, 10, false),
        ];
        let stats = dashboard_stats(&rentals, &items, now);
        assert_eq!(stats.ongoing, 1);
        assert_eq!(stats.available_items, 1);
        assert_eq!(stats.today_rentals, 1);
        assert_eq!(stats.overdue, 1);
    }

    #[test]
    fn test_filter_combines_status_and_search() {
        let mut rentals = vec![
            rental(1, "Umbrella", RentalStatus::Ongoing, "2026-07-01T10:00:00Z"),
            rental(2, "Charger", RentalStatus::Ongoing, "2026-07-02T10:00:00Z"),
            rental(3, "Umbrella", RentalStatus::Overdue, "2026-07-03T10:00:00Z"),
        ];
        rentals[1].renter_name = "Umberto".to_string();

        let by_search = filter_rentals(&rentals, StatusFilter::All, "umb");
        assert_eq!(by_search.len(), 3); // two item-name hits plus a renter-name hit

        let both = filter_rentals(
            &rentals,
            StatusFilter::Only(RentalStatus::Ongoing),
            "umbrella",
        );
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].id, 1);
    }

    #[test]
    fn test_filter_and_paginate_twelve_records() {
        let rentals: Vec<Rental> = (1..=12)
            .map(|id| rental(id, "A", RentalStatus::Ongoing, "2026-07-01T10:00:00Z"))
            .collect();
        let filtered = filter_rentals(&rentals, StatusFilter::All, "");
        assert_eq!(total_pages(filtered.len()), 3);

        let first = page_slice(&filtered, 1);
        assert_eq!(
            first.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
        let last = page_slice(&filtered, 3);
        assert_eq!(last.iter().map(|r| r.id).collect::<Vec<_>>(), vec![11, 12]);
    }

    #[test]
    fn test_page_clamping() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(5, 0), 1);
    }

    #[test]
    fn test_empty_inputs_yield_empty_outputs() {
        let now = parse("2026-08-06T12:00:00Z");
        assert!(popular_items(&[]).is_empty());
        assert!(recent_activity(&[]).is_empty());
        assert!(monthly_totals(&[], now).iter().all(|b| b.rentals == 0 && b.returns == 0));
        assert_eq!(dashboard_stats(&[], &[], now), DashboardStats::default());
        assert!(filter_rentals(&[], StatusFilter::All, "x").is_empty());
        assert_eq!(total_pages(0), 0);
        assert!(page_slice::<Rental>(&[], 1).is_empty());
    }
}
