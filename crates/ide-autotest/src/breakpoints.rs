//! Setting and clearing breakpoints through the editor and the Breakpoints view.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument};

use crate::editor::{
    get_editor_for_file_suffix, line_number_with_cursor, open_document, place_cursor_to_line,
};
use crate::errors::HarnessError;
use crate::names;
use crate::types::View;
use crate::{Ide, UI_CHANGED};

/// A file/line pair.
///
/// Used both for requested breakpoints and for the locations the IDE reports
/// back. Serialized as a single-entry map, `{"main.cpp": 10}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct Breakpoint {
    pub file: String,
    pub line: u32,
}

impl Breakpoint {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl std::fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

impl TryFrom<BTreeMap<String, u32>> for Breakpoint {
    type Error = String;

    fn try_from(map: BTreeMap<String, u32>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "a breakpoint is a single {{file: line}} entry, got {} entries",
                map.len()
            ));
        }
        let (file, line) = map.into_iter().next().ok_or("empty breakpoint map")?;
        Ok(Breakpoint { file, line })
    }
}

impl From<Breakpoint> for BTreeMap<String, u32> {
    fn from(bp: Breakpoint) -> Self {
        BTreeMap::from([(bp.file, bp.line)])
    }
}

/// Remove existing breakpoints, then set one for each entry of `files_and_lines`.
///
/// Returns the breakpoints as the IDE reports them (full file path and the
/// line the cursor ended up on), in input order, so the result can be passed
/// straight to [`crate::do_simple_debugging`]. Returns `None` when the input is
/// empty, a file cannot be opened or the cursor cannot be placed; the reason
/// is in the report.
#[instrument(skip(ide, files_and_lines), fields(count = files_and_lines.len()))]
pub async fn set_breakpoints_for_current_project(
    ide: &Ide,
    files_and_lines: &[Breakpoint],
) -> Result<Option<Vec<Breakpoint>>, HarnessError> {
    match set_breakpoints(ide, files_and_lines).await {
        Err(e) if e.is_lookup_failure() => {
            ide.report().fatal(&format!("{UI_CHANGED} ({e})"));
            Ok(None)
        }
        other => other,
    }
}

async fn set_breakpoints(
    ide: &Ide,
    files_and_lines: &[Breakpoint],
) -> Result<Option<Vec<Breakpoint>>, HarnessError> {
    ide.switch_view_to(View::Debug).await?;
    remove_old_breakpoints(ide).await?;
    if files_and_lines.is_empty() {
        ide.report()
            .fatal("Setting breakpoints needs a non-empty list of file/line pairs.");
        return Ok(None);
    }
    ide.wait_for_object(names::NAVIGATION_TREE, None).await?;

    let mut breakpoints = Vec::with_capacity(files_and_lines.len());
    for requested in files_and_lines {
        if !open_document(ide, &requested.file).await? {
            return Ok(None);
        }
        let Some(editor) = get_editor_for_file_suffix(ide, &requested.file).await? else {
            ide.report()
                .fail(&format!("No editor showed up for {}", requested.file));
            return Ok(None);
        };
        if !place_cursor_to_line(ide, &editor, requested.line).await? {
            return Ok(None);
        }
        ide.invoke_menu_item(&["Debug", "Enable or Disable Breakpoint"])
            .await?;
        let file_path = ide
            .wait_for_object(names::FILENAME_COMBO, None)
            .await?
            .tool_tip()
            .await?;
        let line = line_number_with_cursor(&editor).await?;
        breakpoints.push(Breakpoint::new(file_path, line));
        ide.report().log_detail(
            &format!("Set breakpoint in {}", requested.file),
            &requested.line.to_string(),
        );
    }

    let view = ide.wait_for_object(names::BREAKPOINT_VIEW, None).await?;
    let expected = files_and_lines.len();
    ide.wait_for(ide.timeout(ide.config().timeouts.breakpoint_rows_ms), || {
        let view = view.clone();
        async move { view.row_count().await.map(|n| n == expected).unwrap_or(false) }
    })
    .await;
    let listed = view.row_count().await?;
    ide.report().compare(
        listed,
        expected,
        &format!("Expected {expected} set break points, found {listed} listed"),
    );
    info!("Set {} breakpoints", breakpoints.len());
    Ok(Some(breakpoints))
}

/// Delete every row of the Breakpoints view.
///
/// Expects the Debug mode to be active. Returns whether the view ended up empty.
#[instrument(skip(ide))]
pub async fn remove_old_breakpoints(ide: &Ide) -> Result<bool, HarnessError> {
    ide.report().log("Removing old breakpoints if there are any");
    match remove_breakpoints(ide).await {
        Err(e) if e.is_lookup_failure() => {
            ide.report().fatal(&format!("{UI_CHANGED} ({e})"));
            Ok(false)
        }
        other => other,
    }
}

async fn remove_breakpoints(ide: &Ide) -> Result<bool, HarnessError> {
    let view = ide.wait_for_object(names::BREAKPOINT_VIEW, None).await?;
    let rows = view.row_count().await?;
    if rows == 0 {
        ide.report().log("No breakpoints found...");
    } else {
        ide.report()
            .log(&format!("Found {rows} breakpoints - removing them"));
        for _ in 0..rows {
            // rows shift up after each deletion
            view.click_row(0).await?;
            view.type_keys("<Delete>").await?;
        }
    }
    ide.wait_for(
        ide.timeout(ide.config().timeouts.breakpoint_removal_ms),
        || {
            let view = view.clone();
            async move { view.row_count().await.map(|n| n == 0).unwrap_or(false) }
        },
    )
    .await;
    let remaining = view.row_count().await?;
    Ok(ide
        .report()
        .compare(remaining, 0, "Check if all breakpoints have been removed."))
}
