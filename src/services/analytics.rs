use crate::{
    db::DbPool,
    entities::appointment::{
        self, AppointmentStatus, Entity as AppointmentEntity, Model as AppointmentModel,
    },
    errors::ServiceError,
    services::insights::{InsightsClient, InsightsDigest},
    tenant::TenantScope,
};
use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use strum::{Display, EnumString};
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Rolling report window ending now. Fixed-length windows, not calendar
/// weeks or months.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    Year,
}

impl Period {
    pub fn duration(self) -> Duration {
        match self {
            Period::Week => Duration::days(7),
            Period::Month => Duration::days(30),
            Period::Year => Duration::days(365),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServicePopularity {
    pub service_name: String,
    pub bookings: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TopClient {
    pub client_email: String,
    pub client_name: String,
    pub visits: u64,
    pub total_spent: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StaffPerformance {
    pub staff_id: Uuid,
    pub appointments: u64,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PeakHour {
    pub hour: u32,
    pub appointments: u64,
}

/// Composed business report for one salon over one period window.
/// Computed per request from the salon's appointments, never cached.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsReport {
    pub period: Period,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub total_revenue: Decimal,
    pub total_appointments: u64,
    pub average_ticket: Decimal,
    pub top_services: Vec<ServicePopularity>,
    /// Percentage of distinct clients with more than one lifetime
    /// appointment. Lifetime-scoped while every other metric is
    /// window-scoped; kept that way on purpose.
    pub client_retention: u32,
    pub daily_revenue: Vec<DailyRevenue>,
    pub top_clients: Vec<TopClient>,
    pub staff_performance: Vec<StaffPerformance>,
    pub peak_hours: Vec<PeakHour>,
    pub revenue_growth: f64,
    pub insights: Vec<String>,
}

/// Computes on-demand analytics reports for a salon
#[derive(Clone)]
pub struct AnalyticsService {
    db_pool: Arc<DbPool>,
    insights: InsightsClient,
}

impl AnalyticsService {
    pub fn new(db_pool: Arc<DbPool>, insights: InsightsClient) -> Self {
        Self { db_pool, insights }
    }

    /// Builds the full report for the scoped salon. Three scoped fetches
    /// run concurrently (current window, previous window, lifetime);
    /// every numeric metric folds over the fetched rows in process. A
    /// storage failure aborts the whole report, a narrative-provider
    /// failure only downgrades the insights to static text.
    #[instrument(skip(self), fields(salon_id = %scope.salon_id(), period = %period))]
    pub async fn compute_report(
        &self,
        scope: &TenantScope,
        period: Period,
    ) -> Result<AnalyticsReport, ServiceError> {
        let window_end = Utc::now();
        let window_start = window_end - period.duration();
        let previous_start = window_start - period.duration();

        let (current, previous, lifetime) = tokio::try_join!(
            self.fetch_window(scope, window_start, window_end),
            self.fetch_window(scope, previous_start, window_start),
            self.fetch_lifetime(scope),
        )?;

        let total_revenue = completed_revenue(&current);
        let total_appointments = current.len() as u64;
        let average_ticket = average_ticket(total_revenue, total_appointments);
        let previous_revenue = completed_revenue(&previous);
        let revenue_growth = revenue_growth(total_revenue, previous_revenue);
        let client_retention = client_retention(&lifetime);

        let digest = InsightsDigest {
            period: period.to_string(),
            total_revenue,
            completed_appointments: current
                .iter()
                .filter(|a| a.status == AppointmentStatus::COMPLETED)
                .count() as u64,
            cancelled_appointments: current
                .iter()
                .filter(|a| a.status == AppointmentStatus::CANCELLED)
                .count() as u64,
            retention_rate: client_retention as f64,
            revenue_growth_pct: revenue_growth,
        };
        let insights = self.insights.generate(&digest).await;

        info!(
            total_appointments,
            %total_revenue,
            "Analytics report computed"
        );

        Ok(AnalyticsReport {
            period,
            window_start,
            window_end,
            total_revenue,
            total_appointments,
            average_ticket,
            top_services: top_services(&current),
            client_retention,
            daily_revenue: daily_revenue(&current),
            top_clients: top_clients(&current),
            staff_performance: staff_performance(&current),
            peak_hours: peak_hours(&current),
            revenue_growth,
            insights,
        })
    }

    /// Fetches the scoped salon's appointments whose scheduled moment
    /// falls in `[start, end)`. The SQL filter is on the date column;
    /// the exact datetime bound is applied in process because date and
    /// start time live in separate columns.
    async fn fetch_window(
        &self,
        scope: &TenantScope,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<AppointmentModel>, ServiceError> {
        let db = &*self.db_pool;
        let rows = scope
            .select::<AppointmentEntity>()
            .filter(appointment::Column::ScheduledDate.gte(start.date_naive()))
            .filter(appointment::Column::ScheduledDate.lte(end.date_naive()))
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch appointments for analytics window");
                ServiceError::DataUnavailable(e.to_string())
            })?;

        let start_naive = start.naive_utc();
        let end_naive = end.naive_utc();
        Ok(rows
            .into_iter()
            .filter(|a| {
                let at = a.scheduled_date.and_time(a.start_time);
                at >= start_naive && at < end_naive
            })
            .collect())
    }

    async fn fetch_lifetime(
        &self,
        scope: &TenantScope,
    ) -> Result<Vec<AppointmentModel>, ServiceError> {
        let db = &*self.db_pool;
        scope
            .select::<AppointmentEntity>()
            .all(db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch lifetime appointments for analytics");
                ServiceError::DataUnavailable(e.to_string())
            })
    }
}

/// Sum of completed appointments' prices
pub fn completed_revenue(rows: &[AppointmentModel]) -> Decimal {
    rows.iter()
        .filter(|a| a.status == AppointmentStatus::COMPLETED)
        .map(|a| a.total_price)
        .sum()
}

/// Revenue divided by appointment count, zero for an empty window
pub fn average_ticket(total_revenue: Decimal, total_appointments: u64) -> Decimal {
    if total_appointments == 0 {
        Decimal::ZERO
    } else {
        total_revenue / Decimal::from(total_appointments)
    }
}

/// Top 10 services by booking count
pub fn top_services(rows: &[AppointmentModel]) -> Vec<ServicePopularity> {
    let mut groups: HashMap<&str, (u64, Decimal)> = HashMap::new();
    for row in rows {
        let entry = groups.entry(&row.service_name).or_default();
        entry.0 += 1;
        entry.1 += row.total_price;
    }
    let mut stats: Vec<ServicePopularity> = groups
        .into_iter()
        .map(|(name, (bookings, revenue))| ServicePopularity {
            service_name: name.to_string(),
            bookings,
            revenue,
        })
        .collect();
    stats.sort_by(|a, b| b.bookings.cmp(&a.bookings).then(a.service_name.cmp(&b.service_name)));
    stats.truncate(10);
    stats
}

/// Percentage of distinct clients with more than one appointment,
/// rounded to the nearest integer. Always in 0..=100.
pub fn client_retention(lifetime_rows: &[AppointmentModel]) -> u32 {
    let mut visits: HashMap<&str, u64> = HashMap::new();
    for row in lifetime_rows {
        *visits.entry(&row.client_email).or_default() += 1;
    }
    let distinct = visits.len();
    if distinct == 0 {
        return 0;
    }
    let returning = visits.values().filter(|&&count| count > 1).count();
    ((returning as f64 / distinct as f64) * 100.0).round() as u32
}

/// Completed revenue per calendar date, ascending by date
pub fn daily_revenue(rows: &[AppointmentModel]) -> Vec<DailyRevenue> {
    let mut by_date: std::collections::BTreeMap<NaiveDate, Decimal> =
        std::collections::BTreeMap::new();
    for row in rows {
        if row.status == AppointmentStatus::COMPLETED {
            *by_date.entry(row.scheduled_date).or_default() += row.total_price;
        }
    }
    by_date
        .into_iter()
        .map(|(date, revenue)| DailyRevenue { date, revenue })
        .collect()
}

/// Top 10 clients by spend
pub fn top_clients(rows: &[AppointmentModel]) -> Vec<TopClient> {
    let mut groups: HashMap<&str, (String, u64, Decimal)> = HashMap::new();
    for row in rows {
        let entry = groups
            .entry(&row.client_email)
            .or_insert_with(|| (row.client_name.clone(), 0, Decimal::ZERO));
        entry.1 += 1;
        entry.2 += row.total_price;
    }
    let mut stats: Vec<TopClient> = groups
        .into_iter()
        .map(|(email, (name, visits, total_spent))| TopClient {
            client_email: email.to_string(),
            client_name: name,
            visits,
            total_spent,
        })
        .collect();
    stats.sort_by(|a, b| {
        b.total_spent
            .cmp(&a.total_spent)
            .then(a.client_email.cmp(&b.client_email))
    });
    stats.truncate(10);
    stats
}

/// Per-staff booking count and revenue, highest revenue first.
/// Appointments without an assigned staff member are excluded.
pub fn staff_performance(rows: &[AppointmentModel]) -> Vec<StaffPerformance> {
    let mut groups: HashMap<Uuid, (u64, Decimal)> = HashMap::new();
    for row in rows {
        if let Some(staff_id) = row.staff_id {
            let entry = groups.entry(staff_id).or_default();
            entry.0 += 1;
            entry.1 += row.total_price;
        }
    }
    let mut stats: Vec<StaffPerformance> = groups
        .into_iter()
        .map(|(staff_id, (appointments, revenue))| StaffPerformance {
            staff_id,
            appointments,
            revenue,
        })
        .collect();
    stats.sort_by(|a, b| b.revenue.cmp(&a.revenue).then(a.staff_id.cmp(&b.staff_id)));
    stats
}

/// Booking count per hour of day, busiest first
pub fn peak_hours(rows: &[AppointmentModel]) -> Vec<PeakHour> {
    let mut groups: HashMap<u32, u64> = HashMap::new();
    for row in rows {
        *groups.entry(row.start_time.hour()).or_default() += 1;
    }
    let mut stats: Vec<PeakHour> = groups
        .into_iter()
        .map(|(hour, appointments)| PeakHour { hour, appointments })
        .collect();
    stats.sort_by(|a, b| b.appointments.cmp(&a.appointments).then(a.hour.cmp(&b.hour)));
    stats
}

/// Period-over-period revenue change in percent, rounded to 2 decimals.
/// Zero when there was no previous-window revenue.
pub fn revenue_growth(current: Decimal, previous: Decimal) -> f64 {
    if previous.is_zero() {
        return 0.0;
    }
    let growth = (current - previous) / previous * Decimal::ONE_HUNDRED;
    growth.round_dp(2).to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};
    use rust_decimal_macros::dec;

    fn row(
        client: &str,
        service: &str,
        date: NaiveDate,
        hour: u32,
        status: &str,
        price: Decimal,
    ) -> AppointmentModel {
        AppointmentModel {
            id: Uuid::new_v4(),
            salon_id: Uuid::new_v4(),
            client_name: client.to_string(),
            client_email: format!("{}@example.com", client.to_lowercase()),
            service_name: service.to_string(),
            staff_id: None,
            scheduled_date: date,
            start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            status: status.to_string(),
            total_price: price,
            notes: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    #[test]
    fn zero_case_yields_empty_report_parts() {
        let rows: Vec<AppointmentModel> = vec![];
        assert_eq!(completed_revenue(&rows), Decimal::ZERO);
        assert_eq!(average_ticket(Decimal::ZERO, 0), Decimal::ZERO);
        assert!(top_services(&rows).is_empty());
        assert_eq!(client_retention(&rows), 0);
        assert!(daily_revenue(&rows).is_empty());
        assert!(top_clients(&rows).is_empty());
        assert!(staff_performance(&rows).is_empty());
        assert!(peak_hours(&rows).is_empty());
        assert_eq!(revenue_growth(Decimal::ZERO, Decimal::ZERO), 0.0);
    }

    #[test]
    fn revenue_counts_only_completed() {
        let rows = vec![
            row("Ana", "Haircut", day(1), 10, "completed", dec!(50)),
            row("Bea", "Haircut", day(2), 11, "cancelled", dec!(70)),
            row("Cruz", "Coloring", day(3), 12, "completed", dec!(30)),
            row("Dee", "Coloring", day(3), 13, "pending", dec!(90)),
        ];
        assert_eq!(completed_revenue(&rows), dec!(80));
    }

    #[test]
    fn average_ticket_is_revenue_over_count() {
        let rows = vec![
            row("Ana", "Haircut", day(1), 10, "completed", dec!(60)),
            row("Bea", "Haircut", day(2), 11, "pending", dec!(100)),
        ];
        let revenue = completed_revenue(&rows);
        let ticket = average_ticket(revenue, rows.len() as u64);
        assert_eq!(ticket, dec!(30));
    }

    #[test]
    fn daily_revenue_adds_up_to_total() {
        let rows = vec![
            row("Ana", "Haircut", day(1), 10, "completed", dec!(50)),
            row("Bea", "Haircut", day(1), 11, "completed", dec!(25)),
            row("Cruz", "Coloring", day(3), 12, "completed", dec!(30)),
            row("Dee", "Manicure", day(2), 13, "cancelled", dec!(40)),
        ];
        let series = daily_revenue(&rows);
        let total: Decimal = series.iter().map(|d| d.revenue).sum();
        assert_eq!(total, completed_revenue(&rows));
        // Ascending by date
        assert_eq!(series[0].date, day(1));
        assert_eq!(series[0].revenue, dec!(75));
        assert_eq!(series[1].date, day(3));
    }

    #[test]
    fn top_services_ordered_by_bookings() {
        let rows = vec![
            row("Ana", "Haircut", day(1), 10, "completed", dec!(50)),
            row("Bea", "Haircut", day(2), 11, "completed", dec!(50)),
            row("Cruz", "Coloring", day(3), 12, "completed", dec!(200)),
        ];
        let stats = top_services(&rows);
        assert_eq!(stats[0].service_name, "Haircut");
        assert_eq!(stats[0].bookings, 2);
        assert_eq!(stats[0].revenue, dec!(100));
        assert_eq!(stats[1].service_name, "Coloring");
    }

    #[test]
    fn retention_counts_returning_clients() {
        let rows = vec![
            row("Ana", "Haircut", day(1), 10, "completed", dec!(50)),
            row("Ana", "Haircut", day(8), 10, "completed", dec!(50)),
            row("Bea", "Coloring", day(2), 11, "completed", dec!(70)),
            row("Cruz", "Manicure", day(3), 12, "completed", dec!(30)),
        ];
        // 1 of 3 distinct clients returned
        assert_eq!(client_retention(&rows), 33);
    }

    #[test]
    fn retention_stays_within_bounds() {
        let one_timer = vec![row("Ana", "Haircut", day(1), 10, "completed", dec!(50))];
        assert_eq!(client_retention(&one_timer), 0);

        let all_returning = vec![
            row("Ana", "Haircut", day(1), 10, "completed", dec!(50)),
            row("Ana", "Haircut", day(8), 10, "completed", dec!(50)),
        ];
        assert_eq!(client_retention(&all_returning), 100);
    }

    #[test]
    fn top_clients_ordered_by_spend() {
        let rows = vec![
            row("Ana", "Haircut", day(1), 10, "completed", dec!(50)),
            row("Ana", "Haircut", day(8), 10, "completed", dec!(50)),
            row("Bea", "Coloring", day(2), 11, "completed", dec!(150)),
        ];
        let stats = top_clients(&rows);
        assert_eq!(stats[0].client_email, "bea@example.com");
        assert_eq!(stats[0].total_spent, dec!(150));
        assert_eq!(stats[1].visits, 2);
        assert_eq!(stats[1].total_spent, dec!(100));
    }

    #[test]
    fn staff_performance_excludes_unassigned() {
        let staff_a = Uuid::new_v4();
        let mut assigned = row("Ana", "Haircut", day(1), 10, "completed", dec!(50));
        assigned.staff_id = Some(staff_a);
        let unassigned = row("Bea", "Coloring", day(2), 11, "completed", dec!(70));

        let stats = staff_performance(&[assigned, unassigned]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].staff_id, staff_a);
        assert_eq!(stats[0].appointments, 1);
        assert_eq!(stats[0].revenue, dec!(50));
    }

    #[test]
    fn peak_hours_ordered_by_count() {
        let rows = vec![
            row("Ana", "Haircut", day(1), 14, "completed", dec!(50)),
            row("Bea", "Haircut", day(2), 14, "pending", dec!(50)),
            row("Cruz", "Coloring", day(3), 9, "completed", dec!(30)),
        ];
        let stats = peak_hours(&rows);
        assert_eq!(stats[0].hour, 14);
        assert_eq!(stats[0].appointments, 2);
        assert_eq!(stats[1].hour, 9);
    }

    #[test]
    fn growth_matches_percentage_formula() {
        assert_eq!(revenue_growth(dec!(150), dec!(100)), 50.0);
        assert_eq!(revenue_growth(dec!(80), dec!(100)), -20.0);
        assert_eq!(revenue_growth(dec!(100), dec!(3)), 3233.33);
    }

    #[test]
    fn growth_is_zero_without_previous_revenue() {
        assert_eq!(revenue_growth(dec!(500), Decimal::ZERO), 0.0);
    }

    #[test]
    fn period_window_lengths() {
        assert_eq!(Period::Week.duration(), Duration::days(7));
        assert_eq!(Period::Month.duration(), Duration::days(30));
        assert_eq!(Period::Year.duration(), Duration::days(365));
        assert_eq!("year".parse::<Period>().unwrap(), Period::Year);
    }
}
