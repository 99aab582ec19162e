//! Employee use-case service.
//!
//! # Responsibility
//! - Provide entry points that accept raw form text (the screens' inputs).
//! - Delegate persistence to [`EmployeeStore`].
//!
//! # Invariants
//! - Parsing and validation failures are returned before the store is touched.
//! - Mutations never trigger an implicit re-query; callers list explicitly.

use crate::model::employee::{parse_salary_threshold, Employee, EmployeeId, NewEmployee};
use crate::store::{EmployeeStore, StoreResult};
use log::info;

/// Use-case service over a shared store.
#[derive(Debug, Clone, Copy)]
pub struct EmployeeService<'store> {
    store: &'store EmployeeStore,
}

impl<'store> EmployeeService<'store> {
    pub fn new(store: &'store EmployeeStore) -> Self {
        Self { store }
    }

    /// Opens (or creates) the store and checks it answers queries.
    pub fn connect(&self) -> StoreResult<()> {
        self.store.ensure_open().map(|_| ())
    }

    /// Ensures the store is open and the `employees` table exists.
    pub fn create_table(&self) -> StoreResult<()> {
        self.store.ensure_open()?;
        self.store.ensure_schema()?;
        info!("event=create_table module=service status=ok");
        Ok(())
    }

    /// Registers an employee from form text.
    ///
    /// # Contract
    /// - `salary` accepts `.` or `,` as decimal separator.
    /// - Returns the store-assigned id.
    pub fn register(&self, name: &str, salary: &str, role: &str) -> StoreResult<EmployeeId> {
        let draft = NewEmployee::from_input(name, salary, role)?;
        let id = self.store.insert(&draft)?;
        info!("event=register module=service status=ok id={id}");
        Ok(id)
    }

    pub fn list_all(&self) -> StoreResult<Vec<Employee>> {
        self.store.list_all()
    }

    pub fn search_by_name(&self, text: &str) -> StoreResult<Vec<Employee>> {
        self.store.find_by_name_contains(text)
    }

    /// Searches rows with salary at or above the number typed in `text`.
    pub fn search_by_salary(&self, text: &str) -> StoreResult<Vec<Employee>> {
        let threshold = parse_salary_threshold(text)?;
        self.store.find_by_salary_at_least(threshold)
    }

    pub fn search_by_role(&self, text: &str) -> StoreResult<Vec<Employee>> {
        self.store.find_by_role_contains(text)
    }
}

#[cfg(test)]
mod tests {
    use super::EmployeeService;
    use crate::store::{EmployeeStore, StoreError};

    #[test]
    fn register_parses_form_text() {
        let store = EmployeeStore::in_memory();
        let service = EmployeeService::new(&store);
        service.create_table().unwrap();

        service.register(" Ana ", "1500,00", "Analyst").unwrap();

        let rows = service.list_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ana");
        assert_eq!(rows[0].salary, 1500.0);
    }

    #[test]
    fn salary_search_rejects_text_before_touching_store() {
        let store = EmployeeStore::in_memory();
        let service = EmployeeService::new(&store);

        let err = service.search_by_salary("a lot").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(!store.is_open());
    }

    #[test]
    fn create_table_is_repeatable() {
        let store = EmployeeStore::in_memory();
        let service = EmployeeService::new(&store);
        service.create_table().unwrap();
        service.create_table().unwrap();
        assert!(service.search_by_role("Dev").unwrap().is_empty());
    }
}
