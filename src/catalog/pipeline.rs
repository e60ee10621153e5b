use crate::models::Product;

/// Case-insensitive substring match on title or description.
pub fn matches_query(product: &Product, query: &str) -> bool {
    let needle = query.to_lowercase();
    product.title.to_lowercase().contains(&needle) || product.description.to_lowercase().contains(&needle)
}

/// Whether `product` survives the search box. A blank query (after trimming)
/// lets everything through; otherwise the query is matched as typed.
pub fn passes_search(product: &Product, query: &str) -> bool {
    query.trim().is_empty() || matches_query(product, query)
}

pub fn apply_search(base: Vec<Product>, query: &str) -> Vec<Product> {
    if query.trim().is_empty() {
        return base;
    }
    base.into_iter().filter(|p| matches_query(p, query)).collect()
}

/// The rendered prefix of `filtered` and whether more remain behind it.
pub fn visible(filtered: &[Product], display_count: usize) -> (&[Product], bool) {
    let end = display_count.min(filtered.len());
    (&filtered[..end], display_count < filtered.len())
}

/// The growing prefix of the filtered listing that is rendered.
#[derive(Debug, Clone)]
pub struct DisplayWindow {
    page_size: usize,
    display_count: usize,
    loading_more: bool,
}

impl DisplayWindow {
    pub fn new(page_size: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page_size,
            display_count: page_size,
            loading_more: false,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn display_count(&self) -> usize {
        self.display_count
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn has_more(&self, filtered_len: usize) -> bool {
        self.display_count < filtered_len
    }

    /// Back to the first page; any in-flight load-more is abandoned.
    pub fn reset(&mut self) {
        self.display_count = self.page_size;
        self.loading_more = false;
    }

    /// Claims the load-more slot. Refused while one is in flight or when
    /// nothing is left to show.
    pub fn begin_load_more(&mut self, filtered_len: usize) -> bool {
        if self.loading_more || !self.has_more(filtered_len) {
            return false;
        }
        self.loading_more = true;
        true
    }

    /// Grows the window by one page. Does nothing unless a load-more was
    /// claimed, so a reset in between wins.
    pub fn finish_load_more(&mut self) -> bool {
        if !self.loading_more {
            return false;
        }
        self.loading_more = false;
        self.display_count += self.page_size;
        true
    }
}
