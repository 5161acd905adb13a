use phonenumber::country;
use phonenumber::AsYouTypeFormatter;

fn feed(formatter: &mut AsYouTypeFormatter, input: &str) -> String {
    let mut last = String::new();

    for c in input.chars() {
        last = formatter.input_digit(c).to_owned();
    }

    last
}

#[test]
fn us_number_builds_up_national_format() {
    let mut formatter = AsYouTypeFormatter::new(Some(country::US));

    let out = feed(&mut formatter, "2025551212");

    assert_eq!(
        "2025551212",
        out.chars().filter(|c| c.is_ascii_digit()).collect::<String>()
    );
}

#[test]
fn international_plus_prefix_switches_to_international_layout() {
    let mut formatter = AsYouTypeFormatter::new(Some(country::US));

    assert_eq!("+1 202-555-1212", feed(&mut formatter, "+12025551212"));
}

#[test]
fn ch_national_incremental_matches_group_boundaries() {
    let mut formatter = AsYouTypeFormatter::new(Some(country::CH));

    assert_eq!("044", feed(&mut formatter, "044"));
    assert_eq!("044 6", formatter.input_digit('6'));
    assert_eq!("044 66 8", feed(&mut formatter, "68"));
    assert_eq!("044 668 18 00", feed(&mut formatter, "1800"));
}

#[test]
fn gb_number_under_default_region() {
    let mut formatter = AsYouTypeFormatter::new(Some(country::GB));

    let out = feed(&mut formatter, "02079460018");

    assert_eq!(
        "02079460018",
        out.chars().filter(|c| c.is_ascii_digit()).collect::<String>()
    );
}

#[test]
fn clear_drops_all_accrued_state() {
    let mut formatter = AsYouTypeFormatter::new(Some(country::US));

    feed(&mut formatter, "+12025551212");
    formatter.clear();

    assert_eq!("", formatter.current_output());
    assert_eq!("2", formatter.input_digit('2'));
}

#[test]
fn remembered_position_tracks_a_marked_keystroke() {
    let mut formatter = AsYouTypeFormatter::new(Some(country::US));

    for c in "2025551".chars() {
        formatter.input_digit(c);
    }

    formatter.input_digit_and_remember_position('2');
    formatter.input_digit('1');
    formatter.input_digit('2');

    assert!(formatter.remembered_position().is_some());
}

#[test]
fn non_digit_formatting_noise_falls_back_to_raw_echo() {
    let mut formatter = AsYouTypeFormatter::new(Some(country::US));

    assert_eq!("2", formatter.input_digit('2'));
    assert_eq!("20", formatter.input_digit('0'));
    assert_eq!("20a", formatter.input_digit('a'));
}
