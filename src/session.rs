//! Per-view state the client drives: the product listing and the draft form.

use serde::{Deserialize, Serialize};

use crate::catalog::{
    apply_search, passes_search, visible, CatalogStore, DisplayWindow, FieldErrors, ProductDraft, ProductFields,
};
use crate::error::CatalogError;
use crate::models::{CategoryFilter, ListingPage, Product};

/// Selection, filtered result and display window of the product grid.
#[derive(Debug)]
pub struct ListingSession {
    category: CategoryFilter,
    search: String,
    generation: u64,
    filtered: Vec<Product>,
    window: DisplayWindow,
    loading: bool,
    error: Option<String>,
}

impl ListingSession {
    pub fn new(page_size: usize) -> Self {
        Self {
            category: CategoryFilter::All,
            search: String::new(),
            generation: 0,
            filtered: Vec::new(),
            window: DisplayWindow::new(page_size),
            loading: false,
            error: None,
        }
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    pub fn window(&self) -> &DisplayWindow {
        &self.window
    }

    /// Records the selection and starts a recompute. A changed category or
    /// query starts a new generation and shrinks the window to one page.
    /// Returns the generation the recompute belongs to.
    pub fn select(&mut self, category: CategoryFilter, search: &str) -> u64 {
        if category != self.category || search != self.search {
            self.category = category;
            self.search = search.to_string();
            self.generation += 1;
            self.window.reset();
        }
        self.loading = true;
        self.error = None;
        self.generation
    }

    /// Stores a recompute result if it belongs to the current generation.
    pub fn apply(&mut self, generation: u64, filtered: Vec<Product>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.filtered = filtered;
        self.loading = false;
        true
    }

    /// Records a failed recompute. The previous result stays in place.
    pub fn fail(&mut self, generation: u64, message: String) -> bool {
        if generation != self.generation {
            return false;
        }
        self.error = Some(message);
        self.loading = false;
        true
    }

    pub fn total(&self) -> usize {
        self.filtered.len()
    }

    /// Brings the current result in line with a store change to `id`.
    ///
    /// The full listing is rebuilt from the store. A category listing keeps
    /// its remote part: the changed record is swapped in place, dropped when
    /// it is gone or no longer matches, or appended as a local-only record.
    pub fn sync_record(&mut self, store: &CatalogStore, id: i64) {
        let category = match self.category {
            CategoryFilter::All => {
                self.filtered = apply_search(store.products().to_vec(), &self.search);
                return;
            }
            CategoryFilter::Only(category) => category,
        };

        let current = store
            .get(id)
            .filter(|p| p.category == category && passes_search(p, &self.search));
        let position = self.filtered.iter().position(|p| p.id == id);
        match (position, current) {
            (Some(index), Some(product)) => self.filtered[index] = product.clone(),
            (Some(index), None) => {
                self.filtered.remove(index);
            }
            (None, Some(product)) => self.filtered.push(product.clone()),
            (None, None) => {}
        }
    }

    pub fn begin_load_more(&mut self) -> bool {
        !self.loading && self.window.begin_load_more(self.filtered.len())
    }

    pub fn finish_load_more(&mut self) -> bool {
        self.window.finish_load_more()
    }

    pub fn page(&self) -> ListingPage {
        let (items, has_more) = visible(&self.filtered, self.window.display_count());
        ListingPage {
            items: items.to_vec(),
            total: self.filtered.len(),
            display_count: self.window.display_count(),
            has_more,
            category: self.category,
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", content = "id", rename_all = "lowercase")]
pub enum FormMode {
    #[default]
    Create,
    Edit(i64),
}

/// A partial field update from the form. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DraftPatch {
    pub title: Option<String>,
    pub price: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub rate: Option<String>,
    pub count: Option<String>,
}

/// The create/edit form: the draft, its field errors and submit status.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormSession {
    pub mode: FormMode,
    pub draft: ProductDraft,
    pub errors: FieldErrors,
    pub submitting: bool,
    pub submit_error: Option<String>,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_idle(&self) -> Result<(), CatalogError> {
        if self.submitting {
            return Err(CatalogError::Busy("A submission"));
        }
        Ok(())
    }

    pub fn open_create(&mut self) -> Result<(), CatalogError> {
        self.ensure_idle()?;
        *self = Self::default();
        Ok(())
    }

    pub fn open_edit(&mut self, product: &Product) -> Result<(), CatalogError> {
        self.ensure_idle()?;
        *self = Self {
            mode: FormMode::Edit(product.id),
            draft: ProductDraft::from(product),
            ..Self::default()
        };
        Ok(())
    }

    /// Applies typed values; each touched field loses its pending error.
    pub fn update(&mut self, patch: DraftPatch) {
        let DraftPatch {
            title,
            price,
            description,
            category,
            image,
            rate,
            count,
        } = patch;

        let targets = [
            ("title", title, &mut self.draft.title),
            ("price", price, &mut self.draft.price),
            ("description", description, &mut self.draft.description),
            ("category", category, &mut self.draft.category),
            ("image", image, &mut self.draft.image),
            ("rate", rate, &mut self.draft.rating.rate),
            ("count", count, &mut self.draft.rating.count),
        ];
        for (name, value, slot) in targets {
            if let Some(value) = value {
                *slot = value;
                self.errors.remove(name);
            }
        }
    }

    pub fn set_image(&mut self, data_url: String) {
        self.draft.image = data_url;
        self.errors.remove("image");
    }

    pub fn reject_image(&mut self, message: String) {
        self.errors.insert("image".to_string(), message);
    }

    /// Clears every field and error; the mode is kept. Refused while a
    /// submission is outstanding.
    pub fn reset(&mut self) -> Result<(), CatalogError> {
        self.ensure_idle()?;
        *self = Self {
            mode: self.mode,
            ..Self::default()
        };
        Ok(())
    }

    /// Validates and claims the submit slot. Errors are kept on the form.
    pub fn begin_submit(&mut self) -> Result<(FormMode, ProductFields), CatalogError> {
        self.ensure_idle()?;
        self.submit_error = None;
        match self.draft.validated() {
            Ok(fields) => {
                self.errors.clear();
                self.submitting = true;
                Ok((self.mode, fields))
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(CatalogError::Validation(errors))
            }
        }
    }

    /// A successful submit leaves a fresh create form behind.
    pub fn finish_submit(&mut self) {
        *self = Self::default();
    }

    /// The draft stays populated so the user can retry.
    pub fn fail_submit(&mut self, message: String) {
        self.submitting = false;
        self.submit_error = Some(message);
    }
}
