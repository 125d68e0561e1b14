//! Field table for product pages.
//!
//! Every record field is described by where it lives on the page (a query),
//! what to read from each matching element, and how to reduce the matches.
//! Update this table when the storefront changes its markup.

/// A raw value read from a product page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Developer,
    Publisher,
    ReleaseDate,
    Genres,
    Specs,
    Tags,
    /// Regular listed price
    PurchasePrice,
    /// Struck-through price of a discounted purchase block
    OriginalPrice,
    /// Discounted price of a discounted purchase block
    FinalPrice,
    Sentiment,
    TotalReviews,
    PositiveReviews,
    NegativeReviews,
    Platform,
    Metascore,
    EarlyAccess,
}

/// Where a field lives on the page
#[derive(Debug, Clone, Copy)]
pub enum Query {
    /// Every element matching a CSS selector.
    Css(&'static str),
    /// Direct `child` children of the `index`-th (0-based) `container` match.
    NthChildren {
        container: &'static str,
        index: usize,
        child: &'static str,
    },
    /// Elements sharing a parent with an `anchor` match and carrying `attr="value"`.
    SiblingsWith {
        anchor: &'static str,
        attr: &'static str,
        value: &'static str,
    },
}

/// What to read from each matched element
#[derive(Debug, Clone, Copy)]
pub enum ValueSource {
    /// All descendant text.
    Text,
    /// Direct text nodes only.
    OwnText,
    /// An attribute value.
    Attr(&'static str),
}

/// How the matches collapse into one value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// First non-empty value.
    First,
    /// Every non-empty value, in document order.
    All,
    /// Whether anything matched at all.
    Present,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    pub query: Query,
    pub value: ValueSource,
    pub reducer: Reducer,
}

const fn spec(field: Field, query: Query, value: ValueSource, reducer: Reducer) -> FieldSpec {
    FieldSpec {
        field,
        query,
        value,
        reducer,
    }
}

use Field::*;
use Query::*;
use Reducer::*;
use ValueSource::*;

pub const PRODUCT_FIELDS: &[FieldSpec] = &[
    spec(Title, Css(".apphub_AppName"), Text, First),
    spec(
        Developer,
        Css("div.dev_row > #developers_list > a"),
        Text,
        All,
    ),
    spec(
        Publisher,
        NthChildren {
            container: "div.dev_row",
            index: 1,
            child: "a",
        },
        Text,
        All,
    ),
    spec(ReleaseDate, Css("div.release_date > div.date"), Text, First),
    spec(
        Genres,
        NthChildren {
            container: "div.details_block",
            index: 0,
            child: "a",
        },
        Text,
        All,
    ),
    spec(Specs, Css(".game_area_details_specs a"), Text, All),
    spec(Tags, Css("a.app_tag"), Text, All),
    spec(PurchasePrice, Css(".game_purchase_price"), Text, First),
    spec(OriginalPrice, Css(".discount_original_price"), Text, First),
    spec(FinalPrice, Css(".discount_final_price"), Text, First),
    spec(
        Sentiment,
        SiblingsWith {
            anchor: ".game_review_summary",
            attr: "itemprop",
            value: "description",
        },
        OwnText,
        All,
    ),
    spec(
        TotalReviews,
        Css(r#"label[for="review_type_all"] > span"#),
        Text,
        First,
    ),
    spec(
        PositiveReviews,
        Css(r#"label[for="review_type_positive"] > span"#),
        Text,
        First,
    ),
    spec(
        NegativeReviews,
        Css(r#"label[for="review_type_negative"] > span"#),
        Text,
        First,
    ),
    spec(
        Platform,
        Css("div.game_area_purchase_platform > span"),
        Attr("class"),
        All,
    ),
    spec(
        Metascore,
        Css(r#"#game_area_metascore > div[class*="score"]"#),
        Text,
        First,
    ),
    spec(EarlyAccess, Css(".early_access_header"), Text, Present),
];
