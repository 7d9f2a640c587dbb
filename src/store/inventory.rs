//! The in-memory record store. It owns the working set of CDs for one run of
//! the program together with the running identifier counter, so the UI layer
//! never has to reason about id bookkeeping.

use crate::models::Cd;

/// Ordered working set of CD records. Order reflects insertion/load order and
/// is never sorted. The store also tracks the highest identifier it has seen,
/// which is the baseline for assigning the next one.
pub struct Inventory {
    records: Vec<Cd>,
    last_id: i64,
}

impl Inventory {
    /// An empty store. The first record added to it receives id 1.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            last_id: 0,
        }
    }

    /// Build a store from records loaded off disk.
    pub fn from_records(records: Vec<Cd>) -> Self {
        let mut inventory = Self::new();
        inventory.replace_all(records);
        inventory
    }

    pub fn records(&self) -> &[Cd] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The identifier the next added record will receive, without claiming it.
    /// The add form shows this to the user before the record exists.
    pub fn peek_next_id(&self) -> i64 {
        self.last_id + 1
    }

    /// Claim the next sequential identifier. The counter only moves forward
    /// within a session, so deleting the newest record does not recycle ids.
    pub fn allocate_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    /// Assign the next id and append a new record in one step. The stored
    /// record is echoed back so callers can report what was added without
    /// re-querying the store.
    pub fn add(&mut self, title: impl Into<String>, artist: impl Into<String>) -> Cd {
        let record = Cd::new(self.allocate_id(), title, artist);
        self.records.push(record.clone());
        record
    }

    /// Append a record that already carries an identifier. The counter catches
    /// up when the record's id is ahead of it, keeping later allocations
    /// collision-free.
    pub fn append(&mut self, record: Cd) {
        if record.id > self.last_id {
            self.last_id = record.id;
        }
        self.records.push(record);
    }

    /// Position of the first record with the given id.
    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.records.iter().position(|cd| cd.id == id)
    }

    /// Remove the record at `index`, shifting later records up.
    pub fn remove_at(&mut self, index: usize) -> Cd {
        self.records.remove(index)
    }

    /// Remove the first record with the given id, returning it, or `None` when
    /// no record matches. The rest of the store keeps its relative order.
    pub fn remove(&mut self, id: i64) -> Option<Cd> {
        let index = self.position_of(id)?;
        Some(self.remove_at(index))
    }

    /// Replace the working set with freshly loaded records, discarding any
    /// unsaved changes. Each record goes through [`Inventory::append`], so the
    /// id baseline is rebuilt as the highest id among them regardless of the
    /// order they arrive in.
    pub fn replace_all(&mut self, records: Vec<Cd>) {
        self.records.clear();
        self.last_id = 0;
        for record in records {
            self.append(record);
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_add_on_empty_store_assigns_one() {
        let mut inventory = Inventory::new();
        let record = inventory.add("Abbey Road", "The Beatles");
        assert_eq!(record.id, 1);
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn baseline_is_the_highest_loaded_id_even_out_of_order() {
        let records = vec![
            Cd::new(3, "Kind of Blue", "Miles Davis"),
            Cd::new(7, "Blue Train", "John Coltrane"),
            Cd::new(5, "Giant Steps", "John Coltrane"),
        ];
        let mut inventory = Inventory::from_records(records);
        assert_eq!(inventory.peek_next_id(), 8);
        assert_eq!(inventory.add("Monk's Dream", "Thelonious Monk").id, 8);
    }

    #[test]
    fn ids_are_not_recycled_after_a_delete() {
        let mut inventory = Inventory::new();
        inventory.add("Abbey Road", "The Beatles");
        let second = inventory.add("Thriller", "Michael Jackson");
        assert!(inventory.remove(second.id).is_some());
        assert_eq!(inventory.add("Purple Rain", "Prince").id, 3);
    }

    #[test]
    fn append_catches_the_counter_up() {
        let mut inventory = Inventory::new();
        inventory.append(Cd::new(41, "Graceland", "Paul Simon"));
        assert_eq!(inventory.add("So", "Peter Gabriel").id, 42);
    }

    #[test]
    fn remove_takes_exactly_the_matching_record() {
        let mut inventory = Inventory::from_records(vec![
            Cd::new(1, "Abbey Road", "The Beatles"),
            Cd::new(2, "Thriller", "Michael Jackson"),
            Cd::new(3, "Purple Rain", "Prince"),
        ]);

        let removed = inventory.remove(2).expect("id 2 is present");
        assert_eq!(removed.title, "Thriller");
        assert_eq!(inventory.len(), 2);
        let remaining: Vec<i64> = inventory.records().iter().map(|cd| cd.id).collect();
        assert_eq!(remaining, vec![1, 3]);
    }

    #[test]
    fn removing_an_absent_id_changes_nothing() {
        let mut inventory = Inventory::from_records(vec![Cd::new(2, "Thriller", "Michael Jackson")]);
        assert!(inventory.remove(1).is_none());
        assert_eq!(inventory.len(), 1);
        assert_eq!(inventory.records()[0].id, 2);
    }

    #[test]
    fn position_of_finds_the_first_match() {
        let inventory = Inventory::from_records(vec![
            Cd::new(10, "Abbey Road", "The Beatles"),
            Cd::new(11, "Thriller", "Michael Jackson"),
        ]);
        assert_eq!(inventory.position_of(11), Some(1));
        assert_eq!(inventory.position_of(12), None);
    }

    #[test]
    fn replace_all_recomputes_the_baseline() {
        let mut inventory = Inventory::new();
        inventory.add("Abbey Road", "The Beatles");
        inventory.replace_all(vec![Cd::new(9, "Thriller", "Michael Jackson")]);
        assert_eq!(inventory.peek_next_id(), 10);
        assert_eq!(inventory.len(), 1);
    }
}
