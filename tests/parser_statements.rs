// SPDX-License-Identifier: MIT OR Apache-2.0

use portquery_rust::query_api::{Column, NetworkProtocols, Tristate};
use portquery_rust::sql_compiler::{parse_sosql, SosqlError};

#[test]
fn parse_column_list() {
    let stmt = parse_sosql("SELECT * FROM WWW.GOOGLE.COM").unwrap();
    assert_eq!(stmt.select_set(), &[Column::Port, Column::Tcp, Column::Udp]);
    assert_eq!(stmt.table_reference(), "WWW.GOOGLE.COM");

    let stmt = parse_sosql("SELECT TCP, UDP FROM WWW.YAHOO.COM").unwrap();
    assert_eq!(stmt.select_set(), &[Column::Tcp, Column::Udp]);

    let stmt =
        parse_sosql("SELECT TCP, UDP FROM WWW.YAHOO.COM WHERE PORT BETWEEN 100 AND 500").unwrap();
    assert_eq!(stmt.select_set(), &[Column::Tcp, Column::Udp]);
}

#[test]
fn parse_error_statements() {
    let malformed = [
        "INSERT (1,2) INTO GOOGLE.COM",
        "* FROM GOOGLE.COM",
        "SELECT * FROM 1.1.1.1 WHERE UDP = OPEN badtoken",
        "SELECT * FROM 1.1.1.1; != ",
        "SELECT * FROM GOOGLE.COM WHERE",
        "SELECT * FROM GOOGLE.COM WHERE NOT PORT = CLOSED",
        "SELECT * FROM GOOGLE.COM WHERE UDP AND CLOSED",
        "SELECT * FROM GOOGLE.COM WHERE REJECTED",
        "SELECT * FROM GOOGLE.COM WHERE 1 = OPEN",
        "SELECT * FROM GOOGLE.COM WHERE TCP = 5",
        "select * from 1.1.1.1 where tcp is =",
        "select 4 from 1.1.1.1 where tcp is closed",
        "select *, udp from yahoo.com where udp = open",
        "select * from 1.1.1.1 where port between 2 and )",
        "select * from 1.1.1.1 where port between ( and 80",
        "select * from google.com where port between 1 100",
        "select TCP from reddit.com where port between 1, 100",
        "select UDP from reddit.com where port between 80",
        "select OPEN from reddit.com;    ",
        "select * from msn.com where 4 = google.com",
        "select * from where not port = 1",
        "select TCP, UDP where UDP = open",
        "select *, * from google.com",
        "select select from yahoo.com",
        "SELECT * FROM GOOOGLE.COM WHERE UDP = BETWEEN",
        "SELECT * FROM GOOGLE.COM WHERE UDP IS NOT NOT OPEN",
        "SELECT ; FROM google.com",
        "SELECT < FROM GOOGLE.COM",
        "SELECT UDP FROM GOOGLE.COM WHERE TCP < ,;",
        "SELECT UDP, < FROM GOOGLE.COM WHERE UDP = 4;",
        "select * FROM FROM google.com",
        "Select * from TCP where UDP = 1",
        "SELECT * FROM h WHERE (PORT = 1",
        "SELECT * FROM h WHERE PORT = 1;;",
        "SELECT * FROM h WHERE PORT = 70000",
        "",
    ];

    for query in malformed {
        assert!(parse_sosql(query).is_err(), "accepted malformed query {:?}", query);
    }
}

#[test]
fn parse_errors_are_parse_errors_not_lex_errors() {
    let err = parse_sosql("SELECT * FROM GOOGLE.COM WHERE").unwrap_err();
    assert!(!err.is_lex_error());
    assert!(matches!(err, SosqlError::UnexpectedToken { .. }));
}

#[test]
fn parse_where_statement() {
    let t1 = parse_sosql("SELECT * FROM WWW.YAHOO.COM WHERE PORT BETWEEN 100 AND 500;").unwrap();
    assert_eq!(t1.evaluate_pre_network(1), Tristate::False);
    assert_eq!(t1.evaluate_pre_network(101), Tristate::True);

    let t2 = parse_sosql(
        "SELECT * FROM WWW.YAHOO.COM WHERE PORT BETWEEN 100 AND 500 OR PORT BETWEEN 600 AND 700;",
    )
    .unwrap();
    assert_eq!(t2.evaluate_pre_network(1), Tristate::False);
    assert_eq!(t2.evaluate_pre_network(101), Tristate::True);
    assert_eq!(t2.evaluate_pre_network(550), Tristate::False);
    assert_eq!(t2.evaluate_pre_network(600), Tristate::True);
    assert_eq!(t2.evaluate_pre_network(701), Tristate::False);

    let t3 = parse_sosql("SELECT * FROM 127.0.0.1 WHERE PORT BETWEEN 100 AND 500 AND UDP = OPEN")
        .unwrap();
    assert_eq!(t3.evaluate_pre_network(1), Tristate::False);
    assert_eq!(t3.evaluate_pre_network(101), Tristate::Unknown);
    assert_eq!(t3.evaluate_pre_network(600), Tristate::False);
    assert!(t3.expression().required_protocols().contains(NetworkProtocols::UDP));

    let t4 = parse_sosql("SELECT * FROM 127.0.0.1 WHERE REJECTED = TCP").unwrap();
    assert_eq!(t4.evaluate_pre_network(100), Tristate::Unknown);
    assert_eq!(t4.expression().required_protocols(), NetworkProtocols::TCP);

    let t5 = parse_sosql("SELECT * FROM GOOGLE.COM WHERE NOT PORT = 100").unwrap();
    assert_eq!(t5.evaluate_pre_network(101), Tristate::True);
    assert_eq!(t5.evaluate_pre_network(100), Tristate::False);

    let t6 = parse_sosql("SELECT * FROM GOOGLE.COM WHERE PORT IS 500").unwrap();
    assert_eq!(t6.evaluate_pre_network(500), Tristate::True);

    let t7 = parse_sosql("SELECT * FROM GOOGLE.COM WHERE PORT IS 500 AND UDP IS OPEN").unwrap();
    assert_eq!(t7.evaluate_pre_network(500), Tristate::Unknown);

    let t8 = parse_sosql("select * from google.com where PORT IS NOT 4000").unwrap();
    assert_eq!(t8.evaluate_pre_network(4000), Tristate::False);
    assert_eq!(t8.evaluate_pre_network(4001), Tristate::True);
}

#[test]
fn collect_required_protocols() {
    let cases = [
        ("SELECT * FROM WWW.YAHOO.COM WHERE UDP = CLOSED", NetworkProtocols::ALL),
        ("SELECT PORT, UDP FROM WWW.YAHOO.COM", NetworkProtocols::UDP),
        (
            "SELECT PORT FROM WWW.YAHOO.COM WHERE UDP = CLOSED AND REJECTED = TCP",
            NetworkProtocols::ALL,
        ),
        ("SELECT PORT FROM WWW.YAHOO.COM WHERE PORT < 40", NetworkProtocols::NONE),
        ("SELECT TCP FROM WWW.YAHOO.COM WHERE PORT < 40", NetworkProtocols::TCP),
        ("SELECT PORT FROM h WHERE NOT TCP = OPEN", NetworkProtocols::TCP),
    ];

    for (query, expected) in cases {
        let stmt = parse_sosql(query).unwrap();
        assert_eq!(stmt.required_protocols(), expected, "{}", query);
    }

    // the WHERE clause on its own only names what it references
    let stmt = parse_sosql("SELECT * FROM WWW.YAHOO.COM WHERE UDP = CLOSED").unwrap();
    assert_eq!(stmt.expression().required_protocols(), NetworkProtocols::UDP);
}

#[test]
fn required_protocols_are_structural() {
    let stmt =
        parse_sosql("SELECT PORT FROM h WHERE PORT BETWEEN 100 AND 500 AND UDP = OPEN").unwrap();
    assert_eq!(stmt.evaluate_pre_network(1), Tristate::False);
    assert_eq!(stmt.evaluate_pre_network(600), Tristate::False);
    assert_eq!(stmt.required_protocols(), NetworkProtocols::UDP);
}

#[test]
fn statements_round_trip_through_display() {
    let queries = [
        "SELECT * FROM host;",
        "SELECT TCP, UDP FROM host WHERE PORT BETWEEN 1 AND 1024;",
        "SELECT PORT FROM host WHERE UDP = OPEN AND NOT PORT = 53;",
        "select port from 10.0.0.1 where tcp is not closed or udp <> rejected and port >= 20",
        "SELECT UDP FROM h WHERE (PORT < 10 OR PORT > 20) AND NOT (TCP = OPEN OR UDP = OPEN)",
        "SELECT PORT FROM h WHERE PORT = 1 OR (PORT = 2 OR PORT = 3)",
        "SELECT PORT FROM h WHERE REJECTED = TCP",
    ];

    for query in queries {
        let stmt = parse_sosql(query).unwrap();
        let rendered = stmt.to_string();
        let reparsed = parse_sosql(&rendered)
            .unwrap_or_else(|e| panic!("{:?} rendered as unparsable {:?}: {}", query, rendered, e));
        assert_eq!(stmt, reparsed, "{}", rendered);
    }
}
