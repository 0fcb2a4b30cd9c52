/*!
# Vehicle Trim Catalog Filter

A small web application for browsing a static spreadsheet of vehicle trim
records through cascading filters, built in Rust.

## Overview

The catalog spreadsheet is loaded once at startup and never modified. A user
narrows the rows by picking a series, then a grade within that series, then a
color within that grade; each pick re-derives the downstream option lists and
the visible row set. Matching rows render as a card list or a sortable,
paginated table.

## Architecture

The application follows a client-server architecture:

### Frontend Layer
- **Technologies**: HTML, CSS, JavaScript
- **Key Components**:
  - Picker Row - three cascading selects plus a clear button
  - Card List / Data Table - two presentations of the visible rows
  - Responsive layout - pickers stack vertically on narrow viewports

### Backend Layer
- **Technologies**: Rust, axum
- **Core Components**:
  - Spreadsheet Loader - decodes the first worksheet into row records
  - Option Deriver - distinct trimmed values per filter level
  - Cascading Filter Engine - selection state with cascade resets
  - Exporter - CSV/XLSX download of the visible rows

Data flow is one-directional: loader → row set → option deriver and filter
engine → renderer. Every mutating request settles the whole cascade before
responding, so the page always sees a consistent snapshot.

## Modules

- **car**: the row record and field normalization
- **loader**: CSV/XLSX decoding, keyed by the header row
- **options**: option-list derivation (dedup, trim, first-occurrence order)
- **filter**: selection state machine and visible-row computation
- **downloader**: export of the visible rows (CSV, XLSX)
- **app**: routing and handlers

## REST API Endpoints

- `/api/state` - current selection, option lists, and visible rows
- `/api/select/{series,grade,color}` - apply one selection (null clears it)
- `/api/clear` - reset every selection
- `/api/export?format=csv|xlsx` - download the visible rows
*/

#[cfg(feature = "web")]
pub mod app;
pub mod car;
#[cfg(feature = "web")]
pub mod downloader;
pub mod filter;
pub mod loader;
pub mod options;

/// Re-export the core types to make them easier to use
pub use car::*;
pub use filter::*;
pub use options::*;
