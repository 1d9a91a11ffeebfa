use nc_core::ArticleInput;
use serde::Serialize;

pub const DEFAULT_PER_PAGE: usize = 2;

/// Fixed-size pages over the loaded articles.
#[derive(Debug, Clone)]
pub struct Feed {
    articles: Vec<ArticleInput>,
    per_page: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a> {
    pub number: usize,
    pub total_pages: usize,
    pub items: &'a [ArticleInput],
}

impl Feed {
    pub fn new(articles: Vec<ArticleInput>, per_page: usize) -> Self {
        Self {
            articles,
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn articles(&self) -> &[ArticleInput] {
        &self.articles
    }

    pub fn get(&self, id: &str) -> Option<&ArticleInput> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn total_pages(&self) -> usize {
        self.articles.len().div_ceil(self.per_page)
    }

    /// Page `number` (1-based), clamped to the available range.
    pub fn page(&self, number: usize) -> Page<'_> {
        let total_pages = self.total_pages();
        let number = number.clamp(1, total_pages.max(1));
        let start = ((number - 1) * self.per_page).min(self.articles.len());
        let end = (start + self.per_page).min(self.articles.len());
        Page {
            number,
            total_pages,
            items: &self.articles[start..end],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(n: usize, per_page: usize) -> Feed {
        let articles = (0..n)
            .map(|i| ArticleInput::new(format!("a{}", i), format!("Article {}", i)))
            .collect();
        Feed::new(articles, per_page)
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(feed(0, 2).total_pages(), 0);
        assert_eq!(feed(1, 2).total_pages(), 1);
        assert_eq!(feed(4, 2).total_pages(), 2);
        assert_eq!(feed(5, 2).total_pages(), 3);
    }

    #[test]
    fn test_page_slices_and_clamps() {
        let feed = feed(5, 2);
        let page = feed.page(2);
        assert_eq!(page.number, 2);
        assert_eq!(page.items.iter().map(|a| a.id.as_str()).collect::<Vec<_>>(), vec!["a2", "a3"]);

        assert_eq!(feed.page(0).number, 1);
        let last = feed.page(99);
        assert_eq!(last.number, 3);
        assert_eq!(last.items.len(), 1);
    }

    #[test]
    fn test_empty_feed_page() {
        let feed = feed(0, 2);
        let page = feed.page(1);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_lookup_by_id() {
        let feed = feed(3, 2);
        assert_eq!(feed.get("a1").map(|a| a.title.as_str()), Some("Article 1"));
        assert!(feed.get("zz").is_none());
    }
}
