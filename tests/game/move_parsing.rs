use emogames::game::{
    MoveParser, Split, parse_accept_reject, parse_discrete_move, parse_numeric_split,
};

#[test]
fn discrete_moves_from_free_text() {
    let alphabet = ['J', 'F'];
    assert_eq!(parse_discrete_move("J", &alphabet), Some('J'));
    assert_eq!(parse_discrete_move("  f \n", &alphabet), Some('F'));
    assert_eq!(parse_discrete_move("My move: F", &alphabet), Some('F'));
    assert_eq!(parse_discrete_move("no idea", &alphabet), None);
}

#[test]
fn parsed_move_reparses_to_itself() {
    let parser = MoveParser::new(&['J', 'F']);
    for text in ["I pick J", "F", "let me think... F!", "jj"] {
        let first = parser.parse(text);
        let again = first.and_then(|m| parser.parse(&m.to_string()));
        assert_eq!(first, again, "{text}");
    }
}

#[test]
fn numeric_split_takes_first_pair() {
    assert_eq!(
        parse_numeric_split("I keep 600;400 and that's final, not 500;500"),
        Some(Split { keep: 600.0, give: 400.0 })
    );
    assert_eq!(
        parse_numeric_split("650.5;349.5"),
        Some(Split { keep: 650.5, give: 349.5 })
    );
    assert_eq!(parse_numeric_split("600 ; 400"), None);
    assert_eq!(parse_numeric_split("no numbers"), None);
}

#[test]
fn accept_reject_answers() {
    assert_eq!(parse_accept_reject("ACCEPT"), Some(true));
    assert_eq!(parse_accept_reject(" reject. "), Some(false));
    assert_eq!(parse_accept_reject("maybe"), None);
}
