use employees_core::{Employee, EmployeeStore, EmployeeValidationError, NewEmployee, StoreError};
use std::collections::HashSet;

fn seeded_store() -> EmployeeStore {
    let store = EmployeeStore::in_memory();
    store.ensure_schema().unwrap();
    for (name, salary, role) in [
        ("Ana", 1000.0, "Analyst"),
        ("Anabela", 2000.0, "Senior Analyst"),
        ("Bruno", 3000.0, "Developer"),
    ] {
        store.insert(&NewEmployee::new(name, salary, role)).unwrap();
    }
    store
}

fn names(rows: &[Employee]) -> HashSet<&str> {
    rows.iter().map(|row| row.name.as_str()).collect()
}

#[test]
fn name_substring_search() {
    let store = seeded_store();

    let rows = store.find_by_name_contains("Ana").unwrap();
    assert_eq!(names(&rows), HashSet::from(["Ana", "Anabela"]));

    let rows = store.find_by_name_contains("Bruno").unwrap();
    assert_eq!(names(&rows), HashSet::from(["Bruno"]));

    assert!(store.find_by_name_contains("xyz").unwrap().is_empty());
}

#[test]
fn fragment_is_trimmed() {
    let store = seeded_store();
    let rows = store.find_by_name_contains("  bela ").unwrap();
    assert_eq!(names(&rows), HashSet::from(["Anabela"]));
}

#[test]
fn name_search_is_case_sensitive() {
    let store = seeded_store();
    assert!(store.find_by_name_contains("ana").unwrap().is_empty());
    assert!(store.find_by_name_contains("BRUNO").unwrap().is_empty());
}

#[test]
fn wildcard_characters_match_literally() {
    let store = seeded_store();
    store
        .insert(&NewEmployee::new("100% Ana_B", 10.0, "QA"))
        .unwrap();

    assert_eq!(store.find_by_name_contains("%").unwrap().len(), 1);
    assert_eq!(store.find_by_name_contains("_").unwrap().len(), 1);
    assert!(store.find_by_name_contains("A%a").unwrap().is_empty());
}

#[test]
fn blank_fragment_is_validation_error() {
    let store = seeded_store();

    let err = store.find_by_name_contains("  ").unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(EmployeeValidationError::EmptyFragment(_))
    ));

    let err = store.find_by_role_contains("").unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn salary_threshold_is_inclusive() {
    let store = seeded_store();

    let rows = store.find_by_salary_at_least(2000.0).unwrap();
    let salaries = rows.iter().map(|row| row.salary).collect::<Vec<_>>();
    assert_eq!(salaries.len(), 2);
    assert!(salaries.contains(&2000.0));
    assert!(salaries.contains(&3000.0));

    assert!(store.find_by_salary_at_least(3000.01).unwrap().is_empty());
    assert_eq!(store.find_by_salary_at_least(-1.0).unwrap().len(), 3);
}

#[test]
fn non_finite_threshold_is_validation_error() {
    let store = seeded_store();
    let err = store.find_by_salary_at_least(f64::NAN).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(EmployeeValidationError::InvalidThreshold(_))
    ));
}

#[test]
fn role_substring_search() {
    let store = seeded_store();

    let rows = store.find_by_role_contains("Analyst").unwrap();
    assert_eq!(names(&rows), HashSet::from(["Ana", "Anabela"]));

    let rows = store.find_by_role_contains("Dev").unwrap();
    assert_eq!(names(&rows), HashSet::from(["Bruno"]));

    assert!(store.find_by_role_contains("Manager").unwrap().is_empty());
}

#[test]
fn searches_do_not_mutate() {
    let store = seeded_store();
    let before = store.list_all().unwrap();

    store.find_by_name_contains("Ana").unwrap();
    store.find_by_salary_at_least(0.0).unwrap();
    store.find_by_role_contains("Dev").unwrap();

    assert_eq!(store.list_all().unwrap(), before);
}
