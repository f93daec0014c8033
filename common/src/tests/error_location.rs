use crate::ErrorLocation;
use std::panic::Location;

/// **VALUE**: Verifies that `ErrorLocation::from()` captures the file, line and column.
///
/// **WHY THIS MATTERS**: Every error in the gateway carries an ErrorLocation. If capture
/// breaks, classified errors lose the only pointer back to where they were built.
///
/// **BUG THIS CATCHES**: Would catch if the file path or line stop being copied from
/// the panic location.
#[test]
fn given_location_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN: The current source position
    let expected_line = line!() + 3;

    // WHEN: Creating ErrorLocation from the caller
    let location = ErrorLocation::from(Location::caller());

    // THEN: Should capture file, line, and column
    assert!(location.file.contains("error_location.rs"));
    assert_eq!(location.line, expected_line);
    assert!(location.column > 0);
}

/// **VALUE**: Verifies the `[file:line:column]` Display format.
///
/// **WHY THIS MATTERS**: Every error message ends with this suffix; log scraping and
/// humans both rely on it.
///
/// **BUG THIS CATCHES**: Would catch a changed Display implementation (missing brackets
/// or a dropped component).
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: A fixed ErrorLocation
    let location = ErrorLocation {
        file: "src/service/mod.rs",
        line: 42,
        column: 7,
    };

    // WHEN: Formatting as string
    let formatted = location.to_string();

    // THEN: Should produce "[file:line:column]"
    assert_eq!(formatted, "[src/service/mod.rs:42:7]");
}
