//! The report viewing session.
//!
//! `ReportViewer` is what the dashboard host holds: it owns the decode
//! tri-state, the stale-load guard, the decoded grid with its display
//! columns, and the page window. The host fetches report bytes itself and
//! hands them in; decode results for anything but the latest requested load
//! are discarded, so a slow response can never overwrite a newer file.

use wasm_bindgen::prelude::*;

use crate::classify::{classify, DisplayColumn, REPORT_COLUMN_MAPPINGS};
use crate::decode::decode;
use crate::grid::Grid;
use crate::paginate::{Paginator, VIEWER_PAGE_SIZE};
use crate::render::{render_page, RenderOptions};

/// Status line shown while a report is loading.
pub const LOADING_MESSAGE: &str = "Завантаження...";
/// Status line shown when there is nothing to render.
pub const NO_DATA_MESSAGE: &str = "Немає даних. Спробуйте інші дати або змініть фільтри";

/// Tri-state of the current load, plus the terminal failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// A paginated, styled view over one decoded report.
#[wasm_bindgen]
pub struct ReportViewer {
    generation: u32,
    state: LoadState,
    grid: Grid,
    columns: Vec<DisplayColumn>,
    pager: Paginator,
    options: RenderOptions,
}

#[wasm_bindgen]
impl ReportViewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();
        Self::with_page_size(u32::try_from(VIEWER_PAGE_SIZE).unwrap_or(20))
    }

    /// Construct with a custom page size (e.g., the summary table's 50).
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            generation: 0,
            state: LoadState::Idle,
            grid: Grid::default(),
            columns: Vec::new(),
            pager: Paginator::new(0, page_size as usize),
            options: RenderOptions::default(),
        }
    }

    /// Begin a new load; returns the token the completion must present.
    ///
    /// Calling again before completion invalidates the earlier token.
    pub fn begin_load(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.state = LoadState::Loading;
        self.generation
    }

    /// Complete a load with fetched report bytes.
    ///
    /// Returns false when the token is stale (a newer load was requested)
    /// and the result was discarded. A decode failure is terminal for this
    /// load only: the viewer degrades to an empty grid and reports
    /// "no data", it never throws.
    pub fn complete_load(&mut self, token: u32, data: &[u8]) -> bool {
        if token != self.generation {
            return false;
        }

        match decode(data) {
            Ok(grid) => {
                let classification =
                    classify(&grid.headers(), grid.data_rows(), REPORT_COLUMN_MAPPINGS);
                self.pager.reset(grid.data_row_count());
                self.columns = classification.display_columns;
                self.grid = grid;
                self.state = LoadState::Ready;
            }
            Err(e) => {
                crate::log_error(&format!("report decode failed: {e}"));
                self.grid = Grid::default();
                self.columns = Vec::new();
                self.pager.reset(0);
                self.state = LoadState::Failed(e.to_string());
            }
        }
        true
    }

    /// Record a fetch failure for the given load (network error path).
    pub fn fail_load(&mut self, token: u32, message: &str) -> bool {
        if token != self.generation {
            return false;
        }
        self.grid = Grid::default();
        self.columns = Vec::new();
        self.pager.reset(0);
        self.state = LoadState::Failed(message.to_string());
        true
    }

    /// Render the current page as an HTML table.
    pub fn render_html(&self) -> String {
        render_page(&self.grid, &self.columns, &self.pager, &self.options)
    }

    pub fn next_page(&mut self) {
        self.pager.next_page();
    }

    pub fn prev_page(&mut self) {
        self.pager.prev_page();
    }

    pub fn first_page(&mut self) {
        self.pager.first_page();
    }

    pub fn last_page(&mut self) {
        self.pager.last_page();
    }

    pub fn current_page(&self) -> u32 {
        u32::try_from(self.pager.current_page()).unwrap_or(u32::MAX)
    }

    pub fn page_label(&self) -> String {
        self.pager.page_label()
    }

    pub fn has_multiple_pages(&self) -> bool {
        self.pager.has_multiple_pages()
    }

    pub fn data_row_count(&self) -> u32 {
        u32::try_from(self.grid.data_row_count()).unwrap_or(u32::MAX)
    }

    /// Display column titles, in render order.
    pub fn column_titles(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.title.clone()).collect()
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    /// Whether there is something worth rendering.
    pub fn has_data(&self) -> bool {
        self.state == LoadState::Ready && !self.grid.is_empty() && !self.columns.is_empty()
    }

    /// The panel status line for the current state.
    pub fn status_message(&self) -> String {
        match &self.state {
            LoadState::Loading => LOADING_MESSAGE.to_string(),
            LoadState::Ready if self.has_data() => String::new(),
            _ => NO_DATA_MESSAGE.to_string(),
        }
    }

    /// The terminal failure message, when the last load failed.
    pub fn error_message(&self) -> Option<String> {
        match &self.state {
            LoadState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    pub fn set_apply_styles(&mut self, apply: bool) {
        self.options.apply_styles = apply;
    }
}

impl Default for ReportViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportViewer {
    /// The decoded grid (native callers and tests).
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn display_columns(&self) -> &[DisplayColumn] {
        &self.columns
    }

    pub fn load_state(&self) -> &LoadState {
        &self.state
    }
}
