//! Module: row
//! Responsibility: read-only view of one stored record.
//! Does not own: storage, scanning, or cell versioning.
//! Boundary: expressions and key codecs read rows only through `Row`.

///
/// Row
///
/// One record supplied by the storage layer: a row key plus cells ordered by
/// (family, qualifier).
///

pub trait Row {
    /// Number of cells.
    fn size(&self) -> usize;

    /// Cell at `index` in (family, qualifier) order.
    fn value(&self, index: usize) -> Option<&Cell>;

    /// Raw row-key bytes.
    fn key(&self) -> &[u8];

    /// Cell addressed by column family and qualifier.
    fn value_for(&self, family: &[u8], qualifier: &[u8]) -> Option<&Cell> {
        (0..self.size())
            .filter_map(|index| self.value(index))
            .find(|cell| cell.family == family && cell.qualifier == qualifier)
    }
}

///
/// Cell
///

#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Cell {
    pub family: Vec<u8>,
    pub qualifier: Vec<u8>,
    pub value: Vec<u8>,
    pub timestamp: i64,
}

impl Cell {
    pub fn new(
        family: impl AsRef<[u8]>,
        qualifier: impl AsRef<[u8]>,
        value: impl AsRef<[u8]>,
        timestamp: i64,
    ) -> Self {
        Self {
            family: family.as_ref().to_vec(),
            qualifier: qualifier.as_ref().to_vec(),
            value: value.as_ref().to_vec(),
            timestamp,
        }
    }

    fn column(&self) -> (&[u8], &[u8]) {
        (&self.family, &self.qualifier)
    }
}

///
/// ResultRow
///
/// Owned row with cells kept sorted so column lookups are a binary search.
/// A later cell for the same column replaces the earlier one.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResultRow {
    key: Vec<u8>,
    cells: Vec<Cell>,
}

impl ResultRow {
    pub fn new(key: impl AsRef<[u8]>, cells: impl IntoIterator<Item = Cell>) -> Self {
        let mut row = Self {
            key: key.as_ref().to_vec(),
            cells: Vec::new(),
        };
        for cell in cells {
            row.insert(cell);
        }

        row
    }

    /// Row with a key and no cells.
    pub fn with_key(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
            cells: Vec::new(),
        }
    }

    pub fn insert(&mut self, cell: Cell) {
        match self.position(&cell.family, &cell.qualifier) {
            Ok(index) => self.cells[index] = cell,
            Err(index) => self.cells.insert(index, cell),
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    fn position(&self, family: &[u8], qualifier: &[u8]) -> Result<usize, usize> {
        self.cells
            .binary_search_by(|cell| cell.column().cmp(&(family, qualifier)))
    }
}

impl Row for ResultRow {
    fn size(&self) -> usize {
        self.cells.len()
    }

    fn value(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    fn key(&self) -> &[u8] {
        &self.key
    }

    fn value_for(&self, family: &[u8], qualifier: &[u8]) -> Option<&Cell> {
        self.position(family, qualifier)
            .ok()
            .and_then(|index| self.cells.get(index))
    }
}

///
/// TESTS
///
