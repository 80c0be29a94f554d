//! # Table Builder
//!
//! Construction of new tables and the structural edits offered by the
//! table toolbar. Every function either leaves the table well formed or
//! returns an error without touching it.

use crate::errors::TableError;
use templet_parser::ast::{
    equal_columns, fits_cell_budget, normalize_columns, ColumnSpec, Node, Table, TableCell, TableRow,
};
use templet_parser::Marks;

/// Size used by the toolbar's insert button
pub const DEFAULT_ROWS: usize = 2;
pub const DEFAULT_COLS: usize = 2;

/// Build a `rows` x `cols` table: equal column widths, a header row
/// labelled "Header 1".."Header N" in bold, and empty body rows.
pub fn build_table(rows: usize, cols: usize) -> Result<Table, TableError> {
    if rows == 0 || cols == 0 {
        return Err(TableError::InvalidSize { rows, cols });
    }
    if !fits_cell_budget(rows, cols) {
        return Err(TableError::TooLarge { rows, cols });
    }

    let header = TableRow {
        is_header: true,
        cells: (1..=cols).map(header_cell).collect(),
    };
    let body = (1..rows).map(|_| body_row(cols));

    let table = Table {
        columns: equal_columns(cols),
        rows: std::iter::once(header).chain(body).collect(),
    };
    debug_assert!(table.is_well_formed());
    Ok(table)
}

fn header_cell(index: usize) -> TableCell {
    TableCell::new(vec![Node::paragraph(vec![Node::Text {
        content: format!("Header {}", index),
        marks: Marks::bold(),
    }])])
}

fn body_row(cols: usize) -> TableRow {
    TableRow {
        is_header: false,
        cells: (0..cols).map(|_| TableCell::empty()).collect(),
    }
}

fn cell_start(table: &Table, row: usize, cell: usize) -> Result<(usize, u32), TableError> {
    let cells = &table
        .rows
        .get(row)
        .ok_or(TableError::CellOutOfRange { row, cell })?
        .cells;
    let target = cells.get(cell).ok_or(TableError::CellOutOfRange { row, cell })?;
    Ok((table.rows[row].column_of(cell), target.colspan))
}

/// Insert a column before or after the cell at `(row, cell)`.
///
/// The new column takes `100 / (n + 1)` percent; the others shrink in
/// proportion. A merged cell spanning the insertion point grows instead of
/// being split.
pub fn add_column(table: &mut Table, row: usize, cell: usize, after: bool) -> Result<(), TableError> {
    let (start, colspan) = cell_start(table, row, cell)?;
    let column = if after { start + colspan as usize } else { start };
    let count = table.column_count();
    if !fits_cell_budget(table.row_count(), count + 1) {
        return Err(TableError::TooLarge {
            rows: table.row_count(),
            cols: count + 1,
        });
    }

    for row in &mut table.rows {
        match row.cell_at_column(column) {
            Some((index, first)) if first == column => row.cells.insert(index, TableCell::empty()),
            Some((index, _)) => row.cells[index].colspan += 1,
            None => row.cells.push(TableCell::empty()),
        }
    }

    let width = 100.0 / (count + 1) as f64;
    let scale = (100.0 - width) / 100.0;
    table.columns.iter_mut().for_each(|c| c.width *= scale);
    table.columns.insert(column, ColumnSpec { width });
    normalize_columns(&mut table.columns);

    debug_assert!(table.is_well_formed());
    Ok(())
}

/// Remove the logical column where the cell at `(row, cell)` starts
pub fn delete_column(table: &mut Table, row: usize, cell: usize) -> Result<(), TableError> {
    let (column, _) = cell_start(table, row, cell)?;
    if table.column_count() <= 1 {
        return Err(TableError::LastColumn);
    }

    for row in &mut table.rows {
        if let Some((index, _)) = row.cell_at_column(column) {
            if row.cells[index].colspan > 1 {
                row.cells[index].colspan -= 1;
            } else {
                row.cells.remove(index);
            }
        }
    }

    table.columns.remove(column);
    normalize_columns(&mut table.columns);

    debug_assert!(table.is_well_formed());
    Ok(())
}

/// Insert an empty row before or after `row`.
///
/// The new row takes the header role of the row that ends up after it, or
/// is a body row when appended at the end.
pub fn add_row(table: &mut Table, row: usize, after: bool) -> Result<(), TableError> {
    if row >= table.row_count() {
        return Err(TableError::CellOutOfRange { row, cell: 0 });
    }
    if !fits_cell_budget(table.row_count() + 1, table.column_count()) {
        return Err(TableError::TooLarge {
            rows: table.row_count() + 1,
            cols: table.column_count(),
        });
    }

    let index = if after { row + 1 } else { row };
    let is_header = table.rows.get(index).map(|r| r.is_header).unwrap_or(false);
    let mut new_row = body_row(table.column_count());
    new_row.is_header = is_header;
    table.rows.insert(index, new_row);

    debug_assert!(table.is_well_formed());
    Ok(())
}

pub fn delete_row(table: &mut Table, row: usize) -> Result<(), TableError> {
    if row >= table.row_count() {
        return Err(TableError::CellOutOfRange { row, cell: 0 });
    }
    if table.row_count() <= 1 {
        return Err(TableError::LastRow);
    }
    table.rows.remove(row);
    Ok(())
}

/// Merge `count` adjacent cells of one row, starting at `cell`, into one
/// cell spanning all their columns. Content of non-empty cells is kept in
/// order.
pub fn merge_cells(table: &mut Table, row: usize, cell: usize, count: usize) -> Result<(), TableError> {
    let cells = &mut table
        .rows
        .get_mut(row)
        .ok_or(TableError::CellOutOfRange { row, cell })?
        .cells;
    if count < 2 || cell + count > cells.len() {
        return Err(TableError::InvalidMerge { cell, count });
    }

    let merged: Vec<TableCell> = cells.drain(cell..cell + count).collect();
    let colspan = merged.iter().map(|c| c.colspan).sum();
    let mut children: Vec<Node> = merged
        .into_iter()
        .filter(|c| !c.is_blank())
        .flat_map(|c| c.children)
        .collect();
    if children.is_empty() {
        children.push(Node::empty_paragraph());
    }
    cells.insert(cell, TableCell { colspan, children });

    debug_assert!(table.is_well_formed());
    Ok(())
}

/// Split a merged cell back into single-column cells. Returns false when the
/// cell spans one column only.
pub fn split_cell(table: &mut Table, row: usize, cell: usize) -> Result<bool, TableError> {
    let cells = &mut table
        .rows
        .get_mut(row)
        .ok_or(TableError::CellOutOfRange { row, cell })?
        .cells;
    let target = cells.get_mut(cell).ok_or(TableError::CellOutOfRange { row, cell })?;
    if target.colspan <= 1 {
        return Ok(false);
    }

    let extra = target.colspan - 1;
    target.colspan = 1;
    for offset in 0..extra as usize {
        cells.insert(cell + 1 + offset, TableCell::empty());
    }

    debug_assert!(table.is_well_formed());
    Ok(true)
}

/// Flip the header role of one row
pub fn toggle_header_row(table: &mut Table, row: usize) -> Result<(), TableError> {
    let target = table
        .rows
        .get_mut(row)
        .ok_or(TableError::CellOutOfRange { row, cell: 0 })?;
    target.is_header = !target.is_header;
    Ok(())
}
