/// Utility functions
use chrono::{Datelike, NaiveDate, Utc};
use rand::Rng;

/// First day covered by the APOD archive
pub const ARCHIVE_START: NaiveDate = match NaiveDate::from_ymd_opt(1995, 6, 16) {
    Some(d) => d,
    None => panic!("invalid archive start"),
};

/// Source of the current calendar day
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock in UTC, matching the day the APOD service publishes on
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Picks the date used for a fallback attempt
pub trait DatePicker: Send + Sync {
    fn pick(&self) -> NaiveDate;
}

/// Uniform draw over the archive, bounded by the clock's today
pub struct RandomArchiveDate<C: Clock> {
    clock: C,
}

impl<C: Clock> RandomArchiveDate<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> DatePicker for RandomArchiveDate<C> {
    fn pick(&self) -> NaiveDate {
        random_archive_date(&mut rand::thread_rng(), self.clock.today())
    }
}

/// Draw a day uniformly from `[ARCHIVE_START, today]`
pub fn random_archive_date<R: Rng + ?Sized>(rng: &mut R, today: NaiveDate) -> NaiveDate {
    let span = (today - ARCHIVE_START).num_days();
    if span <= 0 {
        return ARCHIVE_START;
    }
    ARCHIVE_START + chrono::Days::new(rng.gen_range(0..=span) as u64)
}

/// Whether a date is one the archive can serve
pub fn in_archive(date: NaiveDate, today: NaiveDate) -> bool {
    date >= ARCHIVE_START && date <= today
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Escape text for inclusion in HTML bodies and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
