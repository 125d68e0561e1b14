//! Product page extractor
//!
//! Compiles the field table once and turns each product [`Page`] into a
//! [`ProductRecord`]. Extraction never fails: a field whose query matches
//! nothing keeps its default.

use crate::extract::fields::{clean_count, clean_platforms, clean_text};
use crate::extract::page::{child_elements, compile_selector, element_text, own_text, Page};
use crate::extract::record::ProductRecord;
use crate::extract::selectors::{Field, FieldSpec, Query, Reducer, ValueSource, PRODUCT_FIELDS};
use crate::url::{app_id, reviews_url};
use crate::ScrapeError;
use scraper::{ElementRef, Selector};
use std::collections::HashMap;
use tracing::debug;

/// A field table entry with its selector compiled
struct CompiledField {
    spec: FieldSpec,
    query: CompiledQuery,
}

enum CompiledQuery {
    Css(Selector),
    NthChildren {
        container: Selector,
        index: usize,
        child: &'static str,
    },
    SiblingsWith {
        anchor: Selector,
        attr: &'static str,
        value: &'static str,
    },
}

impl CompiledQuery {
    fn compile(query: &Query) -> Result<Self, ScrapeError> {
        Ok(match *query {
            Query::Css(css) => Self::Css(compile_selector(css)?),
            Query::NthChildren {
                container,
                index,
                child,
            } => Self::NthChildren {
                container: compile_selector(container)?,
                index,
                child,
            },
            Query::SiblingsWith {
                anchor,
                attr,
                value,
            } => Self::SiblingsWith {
                anchor: compile_selector(anchor)?,
                attr,
                value,
            },
        })
    }

    /// Matched elements, in document order
    fn matches<'a>(&self, page: &'a Page) -> Vec<ElementRef<'a>> {
        match self {
            Self::Css(selector) => page.select(selector).collect(),
            Self::NthChildren {
                container,
                index,
                child,
            } => page
                .select(container)
                .nth(*index)
                .map(|c| child_elements(c, *child).collect())
                .unwrap_or_default(),
            Self::SiblingsWith {
                anchor,
                attr,
                value,
            } => {
                let (attr, value) = (*attr, *value);
                page.select(anchor)
                    .filter_map(|a| a.parent().and_then(ElementRef::wrap))
                    .flat_map(move |parent| {
                        parent
                            .children()
                            .filter_map(ElementRef::wrap)
                            .filter(move |e| e.value().attr(attr) == Some(value))
                    })
                    .collect()
            }
        }
    }
}

/// A reduced field value
#[derive(Debug, Clone, PartialEq, Eq)]
enum Extracted {
    Text(Option<String>),
    List(Vec<String>),
    Flag(bool),
}

/// Raw values for every field of one page
#[derive(Debug, Default)]
struct FieldValues(HashMap<Field, Extracted>);

impl FieldValues {
    fn text(&self, field: Field) -> Option<String> {
        match self.0.get(&field) {
            Some(Extracted::Text(text)) => text.clone(),
            Some(Extracted::List(items)) => items.first().cloned(),
            _ => None,
        }
    }

    fn list(&self, field: Field) -> Vec<String> {
        match self.0.get(&field) {
            Some(Extracted::List(items)) => items.clone(),
            Some(Extracted::Text(Some(text))) => vec![text.clone()],
            _ => Vec::new(),
        }
    }

    fn flag(&self, field: Field) -> bool {
        matches!(self.0.get(&field), Some(Extracted::Flag(true)))
    }
}

/// Turns product pages into records
pub struct ProductExtractor {
    fields: Vec<CompiledField>,
}

impl ProductExtractor {
    /// Builds an extractor for the storefront's product page layout
    pub fn new() -> Result<Self, ScrapeError> {
        Self::with_fields(PRODUCT_FIELDS)
    }

    /// Builds an extractor from a custom field table
    pub fn with_fields(specs: &[FieldSpec]) -> Result<Self, ScrapeError> {
        let fields = specs
            .iter()
            .map(|spec| {
                Ok(CompiledField {
                    spec: *spec,
                    query: CompiledQuery::compile(&spec.query)?,
                })
            })
            .collect::<Result<Vec<_>, ScrapeError>>()?;

        Ok(Self { fields })
    }

    /// Extracts one record from a product page
    pub fn extract(&self, page: &Page) -> ProductRecord {
        let values = self.read_fields(page);

        let mut record = ProductRecord::new(canonical_page_url(page));

        if let Some(id) = app_id(page.url()) {
            record.reviews_url = Some(reviews_url(&id));
            record.id = Some(id);
        }

        record.title = values.text(Field::Title);
        record.developer = values.list(Field::Developer);
        record.publisher = values.list(Field::Publisher);
        record.release_date = values.text(Field::ReleaseDate);
        record.genres = values.list(Field::Genres);
        record.specs = values.list(Field::Specs);
        record.tags = values.list(Field::Tags);

        let (price, discount_price) = match values.text(Field::PurchasePrice) {
            Some(price) => (Some(price), None),
            None => (
                values.text(Field::OriginalPrice),
                values.text(Field::FinalPrice),
            ),
        };
        record.price = price;
        record.discount_price = discount_price;

        record.sentiment = values.list(Field::Sentiment);
        record.n_reviews = clean_count(values.text(Field::TotalReviews).as_deref());
        record.p_reviews = clean_count(values.text(Field::PositiveReviews).as_deref());
        record.m_reviews = clean_count(values.text(Field::NegativeReviews).as_deref());
        record.platform = clean_platforms(&values.list(Field::Platform));
        record.metascore = values.text(Field::Metascore);
        record.early_access = values.flag(Field::EarlyAccess);

        debug!(
            "Extracted product {} ({}) from {}",
            record.id.as_deref().unwrap_or("-"),
            record.title.as_deref().unwrap_or("untitled"),
            record.url
        );

        record
    }

    fn read_fields(&self, page: &Page) -> FieldValues {
        let mut values = FieldValues::default();

        for compiled in &self.fields {
            let matches = compiled.query.matches(page);

            let extracted = match compiled.spec.reducer {
                Reducer::Present => Extracted::Flag(!matches.is_empty()),
                Reducer::First => Extracted::Text(
                    matches
                        .into_iter()
                        .find_map(|e| read_value(e, compiled.spec.value)),
                ),
                Reducer::All => Extracted::List(
                    matches
                        .into_iter()
                        .filter_map(|e| read_value(e, compiled.spec.value))
                        .collect(),
                ),
            };

            values.0.insert(compiled.spec.field, extracted);
        }

        values
    }
}

fn read_value(element: ElementRef<'_>, source: ValueSource) -> Option<String> {
    match source {
        ValueSource::Text => clean_text(&element_text(element)),
        ValueSource::OwnText => clean_text(&own_text(element)),
        ValueSource::Attr(name) => element.value().attr(name).and_then(clean_text),
    }
}

fn canonical_page_url(page: &Page) -> String {
    match crate::url::canonicalize_url(page.url().as_str()) {
        Ok(url) => url.to_string(),
        Err(e) => {
            debug!("Keeping raw URL {}: {}", page.url(), e);
            page.url().to_string()
        }
    }
}
