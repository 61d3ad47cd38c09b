use rust_decimal::Decimal;
use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar(args: &[&str]) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_feedeskd");
    let mut child = Command::new(exe)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn feedeskd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn amount(v: &serde_json::Value, key: &str) -> Decimal {
    v.get(key)
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse::<Decimal>().ok())
        .expect(key)
}

fn names(students: &serde_json::Value) -> Vec<String> {
    students
        .get("students")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| s.get("name").and_then(|v| v.as_str()).map(|v| v.to_string()))
        .collect()
}

#[test]
fn empty_roster_summary_is_zero() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&[]);

    let summary = request_ok(&mut stdin, &mut reader, "1", "fees.summary", json!({}));
    assert_eq!(summary.get("count").and_then(|v| v.as_u64()), Some(0));
    assert_eq!(amount(&summary, "totalFees"), Decimal::from(0));
    assert_eq!(amount(&summary, "collected"), Decimal::from(0));
    assert_eq!(amount(&summary, "pending"), Decimal::from(0));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn seeded_roster_summary_and_statuses() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&["--seed-demo"]);

    let health = request_ok(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(health.get("studentCount").and_then(|v| v.as_u64()), Some(3));

    let summary = request_ok(&mut stdin, &mut reader, "2", "fees.summary", json!({}));
    assert_eq!(summary.get("count").and_then(|v| v.as_u64()), Some(3));
    assert_eq!(amount(&summary, "totalFees"), Decimal::from(155000));
    assert_eq!(amount(&summary, "collected"), Decimal::from(75000));
    assert_eq!(amount(&summary, "pending"), Decimal::from(80000));
    assert_eq!(
        summary.get("byStatus"),
        Some(&json!({ "unpaid": 1, "partiallyPaid": 1, "fullyPaid": 1 }))
    );

    let listed = request_ok(&mut stdin, &mut reader, "3", "students.list", json!({}));
    let statuses: Vec<String> = listed
        .get("students")
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|s| s.get("status").and_then(|v| v.as_str()).map(|v| v.to_string()))
        .collect();
    assert_eq!(statuses, vec!["fully_paid", "partially_paid", "unpaid"]);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn filter_and_filtered_summary() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&["--seed-demo"]);

    let all = request_ok(&mut stdin, &mut reader, "1", "students.filter", json!({}));
    assert_eq!(names(&all), vec!["John Doe", "Jane Smith", "Mike Johnson"]);

    let data = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.filter",
        json!({ "search": "data", "status": "all" }),
    );
    assert_eq!(names(&data), vec!["Jane Smith"]);

    for (i, term) in ["john", "JOHN", "Doe"].iter().enumerate() {
        let hits = request_ok(
            &mut stdin,
            &mut reader,
            &format!("john-{i}"),
            "students.filter",
            json!({ "search": term }),
        );
        assert!(
            names(&hits).iter().any(|n| n == "John Doe"),
            "term {term} should match John Doe"
        );
    }

    let unpaid = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.filter",
        json!({ "status": "unpaid" }),
    );
    assert_eq!(names(&unpaid), vec!["Mike Johnson"]);

    let partial = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "fees.summary",
        json!({ "status": "partially_paid" }),
    );
    assert_eq!(partial.get("count").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(amount(&partial, "totalFees"), Decimal::from(45000));
    assert_eq!(amount(&partial, "pending"), Decimal::from(20000));

    let bad = request(
        &mut stdin,
        &mut reader,
        "5",
        "students.filter",
        json!({ "status": "overdue" }),
    );
    assert_eq!(
        bad.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("invalid_input")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn classify_reports_status_for_amounts() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&[]);

    let cases = [
        (json!(50000), json!(0), "unpaid"),
        (json!(50000), json!(50000), "fully_paid"),
        (json!("45000"), json!("25000.50"), "partially_paid"),
        (json!(100), json!(150), "fully_paid"),
    ];
    for (i, (total, paid, expected)) in cases.iter().enumerate() {
        let res = request_ok(
            &mut stdin,
            &mut reader,
            &format!("c{i}"),
            "fees.classify",
            json!({ "totalFees": total, "paidAmount": paid }),
        );
        assert_eq!(res.get("status").and_then(|v| v.as_str()), Some(*expected));
    }

    let negative = request(
        &mut stdin,
        &mut reader,
        "neg",
        "fees.classify",
        json!({ "totalFees": 100, "paidAmount": -5 }),
    );
    assert_eq!(negative.get("ok").and_then(|v| v.as_bool()), Some(false));

    drop(stdin);
    let _ = child.wait();
}

fn fee_student(name: &str, total: &str, paid: &str) -> serde_json::Value {
    json!({
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "phone": "+15550000000",
        "course": "Accounting",
        "totalFees": total,
        "paidAmount": paid
    })
}

#[test]
fn fractional_summary_identity_holds_on_the_wire() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&[]);

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "students.create",
        fee_student("Ann", "0.3", "0.1"),
    );
    let summary = request_ok(&mut stdin, &mut reader, "2", "fees.summary", json!({}));
    assert_eq!(summary.get("totalFees"), Some(&json!("0.3")));
    assert_eq!(summary.get("collected"), Some(&json!("0.1")));
    assert_eq!(summary.get("pending"), Some(&json!("0.2")));

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.create",
        fee_student("Ben", "1000.33", "999.99"),
    );
    let summary = request_ok(&mut stdin, &mut reader, "4", "fees.summary", json!({}));
    assert_eq!(
        amount(&summary, "collected") + amount(&summary, "pending"),
        amount(&summary, "totalFees")
    );
    assert_eq!(amount(&summary, "pending"), "0.54".parse::<Decimal>().expect("decimal"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn oversized_amounts_are_rejected_and_daemon_survives() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar(&[]);

    for i in 0..2 {
        let resp = request(
            &mut stdin,
            &mut reader,
            &format!("big-{i}"),
            "students.create",
            fee_student("Huge", "50000000000000000000000000000", "0"),
        );
        assert_eq!(
            resp.get("error")
                .and_then(|e| e.get("code"))
                .and_then(|v| v.as_str()),
            Some("invalid_input")
        );
    }

    // Largest accepted amount, twice, still sums without overflow.
    for i in 0..2 {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("max-{i}"),
            "students.create",
            fee_student("Max", "1000000000000000", "1000000000000000"),
        );
    }
    let summary = request_ok(&mut stdin, &mut reader, "sum", "fees.summary", json!({}));
    assert_eq!(summary.get("count").and_then(|v| v.as_u64()), Some(2));
    assert_eq!(amount(&summary, "totalFees"), Decimal::from(2_000_000_000_000_000_i64));
    assert_eq!(amount(&summary, "pending"), Decimal::from(0));

    let health = request_ok(&mut stdin, &mut reader, "h", "health", json!({}));
    assert_eq!(health.get("studentCount").and_then(|v| v.as_u64()), Some(2));

    drop(stdin);
    let _ = child.wait();
}
