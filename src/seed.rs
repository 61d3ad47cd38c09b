use rust_decimal::Decimal;

use crate::roster::{FieldSet, Roster, RosterError, StudentRecord};

struct DemoStudent {
    name: &'static str,
    email: &'static str,
    phone: &'static str,
    course: &'static str,
    total_fees: i64,
    paid_amount: i64,
}

// Sample roster shown on first launch.
const DEMO_STUDENTS: [DemoStudent; 3] = [
    DemoStudent {
        name: "John Doe",
        email: "john@example.com",
        phone: "+1234567890",
        course: "Computer Science",
        total_fees: 50000,
        paid_amount: 50000,
    },
    DemoStudent {
        name: "Jane Smith",
        email: "jane@example.com",
        phone: "+1987654321",
        course: "Data Science",
        total_fees: 45000,
        paid_amount: 25000,
    },
    DemoStudent {
        name: "Mike Johnson",
        email: "mike@example.com",
        phone: "+1122334455",
        course: "Artificial Intelligence",
        total_fees: 60000,
        paid_amount: 0,
    },
];

/// Appends the demo students through the regular create path and returns
/// what was added.
pub fn load_demo(roster: &mut Roster) -> Result<Vec<StudentRecord>, RosterError> {
    let mut added = Vec::with_capacity(DEMO_STUDENTS.len());
    for s in &DEMO_STUDENTS {
        let fields = FieldSet::new(
            s.name,
            s.email,
            s.phone,
            s.course,
            Decimal::from(s.total_fees),
            Decimal::from(s.paid_amount),
        )?;
        added.push(roster.create_record(fields));
    }
    log::info!("loaded {} demo students", added.len());
    Ok(added)
}
