use std::collections::HashSet;

use rand::Rng;
use rand::RngCore;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Andre", "Beatriz", "Carl", "Chen", "Dolores", "Darnell", "Elena", "Frank",
    "Gloria", "Hassan", "Irene", "Jamal", "Janet", "Kenji", "Linda", "Marcus", "Maria",
    "Nadia", "Oscar", "Patricia", "Priya", "Raymond", "Rosa", "Samuel", "Tanya", "Victor",
    "Walter", "Yolanda", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Abernathy", "Brooks", "Castillo", "Dawson", "Edwards", "Fitzgerald", "Gonzalez",
    "Hoffman", "Iverson", "Jackson", "Kowalski", "Larsen", "Mendoza", "Nguyen", "O'Brien",
    "Patel", "Quinn", "Ramirez", "Schultz", "Takahashi", "Underwood", "Vasquez", "Whitfield",
    "Yamamoto",
];

/// Draw a random full name (first + last).
pub fn generate_juror_name(rng: &mut dyn RngCore) -> String {
    let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
    format!("{first} {last}")
}

/// Draw a name not already in `taken`, retrying up to `attempts` times.
///
/// Falls back to `"Juror {fallback_number}"` after repeated collisions. The
/// returned name is inserted into `taken`.
pub fn unique_juror_name(
    taken: &mut HashSet<String>,
    attempts: u32,
    fallback_number: usize,
    rng: &mut dyn RngCore,
) -> String {
    for _ in 0..attempts {
        let name = generate_juror_name(rng);
        if taken.insert(name.clone()) {
            return name;
        }
    }
    let mut n = fallback_number;
    loop {
        let name = format!("Juror {n}");
        if taken.insert(name.clone()) {
            return name;
        }
        n += 1;
    }
}
