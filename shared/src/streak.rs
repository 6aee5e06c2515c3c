//! Streak and compliance calendar calculation
//!
//! Routines and diets track adherence the same way: a weekly schedule says
//! which weekdays carry an obligation, and one compliance record per calendar
//! date says whether it was met. This module turns those two inputs into the
//! current streak and a fixed 35-day status calendar.
//!
//! # Rules
//!
//! 1. Unscheduled weekdays are rest days: they never extend or break a streak
//! 2. The streak walks back from yesterday and stops at the first scheduled
//!    date that is not explicitly completed
//! 3. Today only counts once it has been marked completed
//! 4. A scheduled day in the past without any record is `pending`, only an
//!    explicit `false` makes it `missed`

use crate::errors::StreakError;
use chrono::{Datelike, Duration, FixedOffset, NaiveDate, Offset, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::str::FromStr;

/// Days before today inspected by the streak walk
pub const STREAK_LOOKBACK_DAYS: i64 = 89;

/// Number of entries in the status calendar
pub const CALENDAR_DAYS: usize = 35;

// ============================================================================
// Weekdays and schedules
// ============================================================================

/// Day of the week a plan item is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    /// Weekday a calendar date falls on
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = StreakError;

    /// Accepts English names and abbreviations as well as the Spanish day
    /// names used by legacy plan data, with or without accents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" | "lunes" => Ok(DayOfWeek::Monday),
            "tuesday" | "tue" | "martes" => Ok(DayOfWeek::Tuesday),
            "wednesday" | "wed" | "miércoles" | "miercoles" => Ok(DayOfWeek::Wednesday),
            "thursday" | "thu" | "jueves" => Ok(DayOfWeek::Thursday),
            "friday" | "fri" | "viernes" => Ok(DayOfWeek::Friday),
            "saturday" | "sat" | "sábado" | "sabado" => Ok(DayOfWeek::Saturday),
            "sunday" | "sun" | "domingo" => Ok(DayOfWeek::Sunday),
            _ => Err(StreakError::InvalidWeekday(s.to_string())),
        }
    }
}

impl TryFrom<String> for DayOfWeek {
    type Error = StreakError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Set of weekdays on which a plan has at least one activity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySchedule(BTreeSet<DayOfWeek>);

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a schedule from weekday names, failing on the first unknown one
    pub fn parse<I>(names: I) -> Result<Self, StreakError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| name.as_ref().parse::<DayOfWeek>())
            .collect()
    }

    pub fn insert(&mut self, day: DayOfWeek) -> bool {
        self.0.insert(day)
    }

    pub fn contains(&self, day: DayOfWeek) -> bool {
        self.0.contains(&day)
    }

    /// Whether the weekday of `date` is scheduled
    pub fn is_scheduled(&self, date: NaiveDate) -> bool {
        self.contains(DayOfWeek::of(date))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = DayOfWeek> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<DayOfWeek> for WeeklySchedule {
    fn from_iter<T: IntoIterator<Item = DayOfWeek>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// Compliance lookup
// ============================================================================

/// Stored outcome of one scheduled date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub date: NaiveDate,
    pub completed: bool,
}

/// Source of per-date compliance used by the calculator
///
/// `None` means no record exists for that date yet, which is distinct from
/// an explicit `Some(false)`.
pub trait ComplianceLookup {
    fn completed_on(&self, date: NaiveDate) -> Option<bool>;
}

impl<S: BuildHasher> ComplianceLookup for HashMap<NaiveDate, bool, S> {
    fn completed_on(&self, date: NaiveDate) -> Option<bool> {
        self.get(&date).copied()
    }
}

impl ComplianceLookup for BTreeMap<NaiveDate, bool> {
    fn completed_on(&self, date: NaiveDate) -> Option<bool> {
        self.get(&date).copied()
    }
}

impl ComplianceLookup for [ComplianceRecord] {
    fn completed_on(&self, date: NaiveDate) -> Option<bool> {
        self.iter()
            .filter(|record| record.date == date)
            .fold(None, |acc, record| Some(acc.unwrap_or(false) || record.completed))
    }
}

/// Index compliance records by date
///
/// When several records share a date (for example after a plan day was
/// recreated) the date counts as completed if any of them is.
pub fn index_compliance<I>(records: I) -> HashMap<NaiveDate, bool>
where
    I: IntoIterator<Item = ComplianceRecord>,
{
    let mut map = HashMap::new();
    for record in records {
        let entry = map.entry(record.date).or_insert(false);
        *entry = *entry || record.completed;
    }
    map
}

// ============================================================================
// Result types
// ============================================================================

/// Status of a single calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Completed,
    Missed,
    Rest,
    Pending,
    Future,
}

/// One entry of the status calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// Current streak plus the 35-day calendar, oldest day first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    pub streak: u32,
    pub calendar: Vec<CalendarDay>,
}

// ============================================================================
// Calculation
// ============================================================================

/// Compute streak and calendar for a schedule as of `today`
pub fn calculate<C>(schedule: &WeeklySchedule, compliance: &C, today: NaiveDate) -> StreakResult
where
    C: ComplianceLookup + ?Sized,
{
    StreakResult {
        streak: current_streak(schedule, compliance, today),
        calendar: calendar(schedule, compliance, today),
    }
}

/// Count consecutive completed scheduled days ending at `today`
pub fn current_streak<C>(schedule: &WeeklySchedule, compliance: &C, today: NaiveDate) -> u32
where
    C: ComplianceLookup + ?Sized,
{
    let mut streak = 0;

    for offset in 1..=STREAK_LOOKBACK_DAYS {
        let Some(date) = today.checked_sub_signed(Duration::days(offset)) else {
            break;
        };
        if !schedule.is_scheduled(date) {
            continue;
        }
        if compliance.completed_on(date) == Some(true) {
            streak += 1;
        } else {
            break;
        }
    }

    // Today only counts on a scheduled day
    if schedule.is_scheduled(today) && compliance.completed_on(today) == Some(true) {
        streak += 1;
    }

    streak
}

/// Build the status calendar for the 35 days ending at `today`
pub fn calendar<C>(schedule: &WeeklySchedule, compliance: &C, today: NaiveDate) -> Vec<CalendarDay>
where
    C: ComplianceLookup + ?Sized,
{
    (0..CALENDAR_DAYS as i64)
        .rev()
        .filter_map(|offset| today.checked_sub_signed(Duration::days(offset)))
        .map(|date| CalendarDay {
            date,
            status: status_on(schedule, compliance, date, today),
        })
        .collect()
}

/// Status of a single date relative to `today`
pub fn status_on<C>(
    schedule: &WeeklySchedule,
    compliance: &C,
    date: NaiveDate,
    today: NaiveDate,
) -> DayStatus
where
    C: ComplianceLookup + ?Sized,
{
    if date > today {
        return DayStatus::Future;
    }
    if !schedule.is_scheduled(date) {
        return DayStatus::Rest;
    }
    match compliance.completed_on(date) {
        Some(true) => DayStatus::Completed,
        Some(false) if date < today => DayStatus::Missed,
        _ => DayStatus::Pending,
    }
}

/// Parse a strict `YYYY-MM-DD` date
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, StreakError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| StreakError::InvalidDate(value.to_string()))
}

/// String-typed entry point: weekday names, ISO-dated compliance and today
pub fn calculate_from_iso<W, C, K>(
    weekdays: W,
    compliance: C,
    today: &str,
) -> Result<StreakResult, StreakError>
where
    W: IntoIterator,
    W::Item: AsRef<str>,
    C: IntoIterator<Item = (K, bool)>,
    K: AsRef<str>,
{
    let schedule = WeeklySchedule::parse(weekdays)?;
    let today = parse_iso_date(today)?;
    let window = STREAK_LOOKBACK_DAYS.max(CALENDAR_DAYS as i64);
    if today.checked_sub_signed(Duration::days(window)).is_none() {
        return Err(StreakError::InvalidDate(today.to_string()));
    }
    let records = compliance
        .into_iter()
        .map(|(date, completed)| {
            parse_iso_date(date.as_ref()).map(|date| ComplianceRecord { date, completed })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(calculate(&schedule, &index_compliance(records), today))
}

/// Serializable calculator input, as sent by browser clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakInput {
    pub scheduled_weekdays: Vec<String>,
    #[serde(default)]
    pub compliance: BTreeMap<String, bool>,
    pub today: String,
}

impl StreakInput {
    pub fn evaluate(&self) -> Result<StreakResult, StreakError> {
        calculate_from_iso(
            &self.scheduled_weekdays,
            self.compliance.iter().map(|(date, done)| (date, *done)),
            &self.today,
        )
    }
}

/// Current calendar date at a fixed UTC offset (in minutes)
pub fn today_at_offset(offset_minutes: i32) -> NaiveDate {
    let offset = FixedOffset::east_opt(offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset).date_naive()
}
