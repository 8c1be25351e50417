use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime,
};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

/// Calendar days travel as `YYYY-MM-DD`, the format of an HTML date input.
pub(crate) fn parse_calendar_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
}

pub(crate) fn format_calendar_date(value: Date) -> String {
    value
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| value.to_string())
}

/// Long form used on the student dashboard, e.g. `Monday, 06 January 2025`.
pub(crate) fn format_dashboard_date(value: Date) -> String {
    value
        .format(format_description!("[weekday], [day] [month repr:long] [year]"))
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Month, Time};

    #[test]
    fn format_primitive_outputs_utc_z() {
        let date = Date::from_calendar_date(2025, Month::January, 2).unwrap();
        let time = Time::from_hms(10, 20, 30).unwrap();
        let value = PrimitiveDateTime::new(date, time);
        assert_eq!(format_primitive(value), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn calendar_date_roundtrips_through_form_format() {
        let parsed = parse_calendar_date(" 2025-03-04 ").expect("date");
        assert_eq!(parsed, Date::from_calendar_date(2025, Month::March, 4).unwrap());
        assert_eq!(format_calendar_date(parsed), "2025-03-04");
    }

    #[test]
    fn calendar_date_rejects_other_layouts() {
        assert!(parse_calendar_date("04/03/2025").is_err());
        assert!(parse_calendar_date("2025-13-01").is_err());
        assert!(parse_calendar_date("").is_err());
    }

    #[test]
    fn dashboard_date_spells_out_weekday_and_month() {
        let date = Date::from_calendar_date(2025, Month::January, 6).unwrap();
        assert_eq!(format_dashboard_date(date), "Monday, 06 January 2025");
    }
}
