use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Asia::Seoul;
use chrono_tz::Tz;

/// Source of wall-clock time for time replies, greetings and context lines.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Tz>;
}

/// Real time in the persona's home zone (Asia/Seoul).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&Seoul)
    }
}

/// Frozen clock for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Tz>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Tz> {
        self.0
    }
}

const WEEKDAYS: [&str; 7] = ["월", "화", "수", "목", "금", "토", "일"];

/// Literal answer to a time query. Minutes are only spoken when nonzero.
pub fn time_reply(now: &DateTime<Tz>) -> String {
    if now.minute() > 0 {
        format!("지금 {}시 {}분이야", now.hour(), now.minute())
    } else {
        format!("지금 {}시야", now.hour())
    }
}

/// Opening line of a session, keyed by the hour.
pub fn greeting(now: &DateTime<Tz>) -> &'static str {
    match now.hour() {
        4..=6 => "벌써 일어났어?",
        7..=10 => "좋은 아침~",
        11..=13 => "점심 먹었어?",
        14..=17 => "오후네~ 오늘 어때?",
        18..=20 => "저녁 먹었어?",
        21..=23 => "늦은 시간이네",
        _ => "아직 안 잤어?",
    }
}

/// System instruction telling the backend what time it is.
pub fn time_context_line(now: &DateTime<Tz>) -> String {
    let weekday = WEEKDAYS[now.weekday().num_days_from_monday() as usize];
    format!(
        "[시스템] 현재: {}년 {}월 {}일 ({}) {}시 {}분",
        now.year(),
        now.month(),
        now.day(),
        weekday,
        now.hour(),
        now.minute()
    )
}
