// Markup rendering for HtmlTable.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write};

use super::table::{CellElement, HtmlTable, RowElement};

fn escape(out: &mut impl Write, text: &str) -> fmt::Result {
    for ch in text.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' => out.write_str("&quot;")?,
            '\'' => out.write_str("&#39;")?,
            other => out.write_char(other)?,
        }
    }
    Ok(())
}

fn write_attrs(out: &mut impl Write, attributes: &BTreeMap<String, String>, classes: &BTreeSet<String>) -> fmt::Result {
    if !classes.is_empty() {
        out.write_str(" class=\"")?;
        let joined = classes.iter().map(String::as_str).collect::<Vec<_>>().join(" ");
        escape(out, &joined)?;
        out.write_char('"')?;
    }
    for (name, value) in attributes {
        write!(out, " {name}=\"")?;
        escape(out, value)?;
        out.write_char('"')?;
    }
    Ok(())
}

fn write_cell(out: &mut impl Write, cell: &CellElement) -> fmt::Result {
    out.write_str("<td")?;
    write_attrs(out, &cell.attributes, &cell.classes)?;
    out.write_char('>')?;
    escape(out, &cell.text)?;
    if let Some(image) = &cell.image {
        out.write_str("<img src=\"")?;
        escape(out, &image.src)?;
        out.write_str("\" alt=\"")?;
        escape(out, &image.alt)?;
        out.write_char('"')?;
        if let Some(title) = &image.title {
            out.write_str(" title=\"")?;
            escape(out, title)?;
            out.write_char('"')?;
        }
        out.write_str(">")?;
    }
    out.write_str("</td>")
}

fn write_row(out: &mut impl Write, row: &RowElement) -> fmt::Result {
    write!(out, "<tr data-row-id=\"{}\"", row.id().0)?;
    write_attrs(out, &BTreeMap::new(), &row.classes)?;
    if row.hidden {
        out.write_str(" hidden")?;
    }
    out.write_char('>')?;
    for cell in &row.cells {
        write_cell(out, cell)?;
    }
    out.write_str("</tr>\n")
}

impl fmt::Display for HtmlTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<table id=\"")?;
        escape(f, self.id())?;
        f.write_char('"')?;
        write_attrs(f, &BTreeMap::new(), &self.classes)?;
        f.write_str(">\n<thead><tr>")?;
        for header in &self.headers {
            f.write_str("<th")?;
            write_attrs(f, &header.attributes, &header.classes)?;
            f.write_char('>')?;
            escape(f, &header.label)?;
            f.write_str("</th>")?;
        }
        f.write_str("</tr></thead>\n<tbody>\n")?;
        for row in self.rows() {
            write_row(f, row)?;
        }
        f.write_str("</tbody>\n</table>")
    }
}
