// CSV export of what the user currently sees: header labels, then the
// visible rows in their current order.
use csv::WriterBuilder;

use crate::dom::TableHandle;
use crate::error::EngineError;

// Brazilian spreadsheets expect ';' since ',' is the decimal separator.
const DELIMITER: u8 = b';';

pub fn export_visible_csv<T: TableHandle + ?Sized>(table: &T) -> Result<String, EngineError> {
    let mut writer = WriterBuilder::new().delimiter(DELIMITER).from_writer(Vec::new());

    let columns = table.header_count();
    writer.write_record((0..columns).map(|header| table.header_label(header).unwrap_or("")))?;
    for row in (0..table.row_count()).filter(|&row| !table.is_row_hidden(row)) {
        writer.write_record((0..columns).map(|column| table.cell_text(row, column)))?;
    }

    let bytes = writer.into_inner().map_err(|e| EngineError::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
