use super::*;

#[test]
fn names_and_aliases_parse() {
    for kind in EntityKind::ALL {
        assert_eq!(kind.name().parse::<EntityKind>().expect("own name"), kind);
        assert_eq!(kind.spec().kind, kind);
    }
    assert_eq!(
        "success_stories".parse::<EntityKind>().expect("underscore"),
        EntityKind::SuccessStories
    );
    assert_eq!(
        " Testimonials ".parse::<EntityKind>().expect("alias"),
        EntityKind::SuccessStories
    );
}

#[test]
fn unknown_names_are_typed_errors() {
    let err = "invoices".parse::<EntityKind>().expect_err("unknown");
    match &err {
        ConsoleError::UnknownEntity { name, expected } => {
            assert_eq!(name, "invoices");
            assert!(expected.contains("requirements"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().starts_with("unknown entity \"invoices\""));
}
