use super::*;

fn ctx(now: &str) -> RenderCtx {
    RenderCtx {
        now: OffsetDateTime::parse(now, &Rfc3339).expect("now"),
    }
}

#[test]
fn recent_rows_show_relative_age() {
    let c = ctx("2026-03-10T12:00:00Z");
    assert_eq!(fmt_age("2026-03-10T11:59:30Z", &c), "just now");
    assert_eq!(fmt_age("2026-03-10T11:15:00Z", &c), "45m ago");
    assert_eq!(fmt_age("2026-03-09T12:00:00Z", &c), "24h ago");
    assert_eq!(fmt_age("2026-03-05T12:00:00Z", &c), "5d ago");
}

#[test]
fn old_or_unparseable_rows_show_absolute() {
    let c = ctx("2026-03-10T12:00:00Z");
    assert_eq!(fmt_age("2026-01-01T08:30:00Z", &c), "2026-01-01 08:30Z");
    assert_eq!(fmt_age("yesterday", &c), "yesterday");
    assert_eq!(fmt_ts_ui("2026-01-01T08:30:00Z"), "2026-01-01 08:30Z");
}
