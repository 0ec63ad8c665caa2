use chrono::{Duration, TimeZone, Utc};
use strategy_chart::core::{IndexDateFormatter, TimeFrame, VolumeFormatter, format_value};

#[test]
fn volume_labels_use_the_magnitude_of_the_largest_volume() {
    let millions = VolumeFormatter::new(2_500_000.0);
    assert_eq!(millions.suffix(), "M");
    assert_eq!(millions.format(1_000_000.0), "1M");
    assert_eq!(millions.format(2_900_000.0), "2M");
    assert_eq!(millions.format(3_100_000.0), "");

    let billions = VolumeFormatter::new(7.5e9);
    assert_eq!(billions.suffix(), "G");
    assert_eq!(billions.format(5e9), "5G");

    let quadrillions = VolumeFormatter::new(4e18);
    assert_eq!(quadrillions.suffix(), "P");
    assert_eq!(quadrillions.format(4e18), "4000P");

    let empty = VolumeFormatter::new(0.0);
    assert_eq!(empty.format(0.0), "0");
    assert_eq!(empty.format(f64::NAN), "");
}

#[test]
fn index_dates_skip_calendar_gaps() {
    let friday = Utc
        .with_ymd_and_hms(2024, 5, 3, 0, 0, 0)
        .single()
        .expect("valid date");
    let monday = friday + Duration::days(3);
    let formatter = IndexDateFormatter::new(vec![friday, monday], "%a %d");

    assert_eq!(formatter.pattern(), "%a %d");
    assert_eq!(formatter.format(0.0), "Fri 03");
    assert_eq!(formatter.format(1.0), "Mon 06");
    assert_eq!(formatter.format(1.6), "");
    assert_eq!(formatter.format(-0.6), "");
}

#[test]
fn values_and_timeframes_render_for_labels() {
    assert_eq!(format_value(1234.5678), "1234.57");
    assert_eq!(format_value(f64::NAN), "NaN");
    assert_eq!(TimeFrame::Minutes.name(1), "Minute");
    assert_eq!(TimeFrame::Weeks.name(2), "Weeks");
}
