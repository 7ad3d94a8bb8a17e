//! Opening documents and moving the text cursor.

use tracing::debug;

use crate::errors::HarnessError;
use crate::names;
use crate::object_name::ObjectName;
use crate::types::Property;
use crate::utils::{basename, suffix};
use crate::{Element, Ide};

/// Editor widget the IDE uses for files like `file`.
pub fn editor_for_file_suffix(file: &str) -> ObjectName {
    let name = match suffix(file).as_deref() {
        Some("cpp" | "cc" | "cxx" | "c" | "h" | "hpp" | "hxx") => names::CPP_EDITOR,
        Some("qml" | "js") => names::QML_EDITOR,
        Some("pro" | "pri" | "prf") => names::PRO_EDITOR,
        _ => names::PLAIN_TEXT_EDITOR,
    };
    ObjectName::from(name)
}

/// Wait for the editor matching `file`'s type. `None` if it does not show up.
pub async fn get_editor_for_file_suffix(
    ide: &Ide,
    file: &str,
) -> Result<Option<Element>, HarnessError> {
    let timeout = ide.timeout(ide.config().timeouts.editor_ms);
    ide.try_wait_for_object(editor_for_file_suffix(file), Some(timeout))
        .await
}

/// Open `file` through the locator and wait for its editor to become current.
pub async fn open_document(ide: &Ide, file: &str) -> Result<bool, HarnessError> {
    ide.select_from_locator(file).await?;
    let window = ide.wait_for_object(names::MAIN_WINDOW, None).await?;
    let prefix = format!("{} ", basename(file));
    let opened = ide
        .wait_for_property(
            &window,
            Property::WindowTitle,
            ide.timeout(ide.config().timeouts.editor_ms),
            |title| title.starts_with(&prefix),
        )
        .await;
    if opened.is_satisfied() {
        debug!("Opened {}", file);
        Ok(true)
    } else {
        ide.report().fail_detail(
            &format!("Could not open {file}"),
            &format!("window title: {:?}", opened.into_last()),
        );
        Ok(false)
    }
}

/// Move the cursor of `editor` to `line` (1-based) using the locator's goto-line filter.
pub async fn place_cursor_to_line(
    ide: &Ide,
    editor: &Element,
    line: u32,
) -> Result<bool, HarnessError> {
    ide.select_from_locator(&format!("l {line}")).await?;
    let expected = line.to_string();
    let placed = ide
        .wait_for_property(
            editor,
            Property::CursorLine,
            ide.timeout(ide.config().timeouts.editor_ms),
            |current| current.trim() == expected,
        )
        .await;
    if placed.is_satisfied() {
        Ok(true)
    } else {
        ide.report().fail_detail(
            &format!("Could not place cursor to line {line}"),
            &format!("cursor is at {:?}", placed.into_last()),
        );
        Ok(false)
    }
}

pub async fn line_number_with_cursor(editor: &Element) -> Result<u32, HarnessError> {
    editor.cursor_line().await
}
