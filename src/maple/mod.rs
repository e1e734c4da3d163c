//! Maple data: record types, the client, and shape conversion
//!
//! Maple exports customers and knowledge-base articles. This module reads
//! them (from an uploaded archive or a static fixture) and converts them to
//! and from the platform's normalized item shape.

mod client;
mod connection;
mod denormalize;
mod extractors;
mod fixture;
mod normalize;
mod types;

pub use client::{ATTACHMENTS_UNSUPPORTED, MapleClient};
pub use connection::{
    ARCHIVE_REFERENCE_KEYS, ArchiveReference, KEYRING_FIELD_CONTAINERS, KEYRING_REFERENCE_KEYS,
    find_reference, missing_reference_error, reference_from_keyring, resolve_archive_reference,
};
pub use denormalize::{ArticleDenormalizer, CustomerDenormalizer};
pub use extractors::{ArticlesExtractor, CustomersExtractor};
pub use fixture::MapleFixture;
pub use normalize::{
    ArticleNormalizer, CustomerNormalizer, item_url, normalize_article, normalize_customer,
};
pub use types::{
    ArticleMetadata, ExternalCustomer, ExternalMapleKb, ItemType, missing_content_placeholder,
};
