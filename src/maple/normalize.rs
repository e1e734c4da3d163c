//! Conversion of Maple records into normalized items

use super::{ExternalCustomer, ExternalMapleKb, ItemType};
use crate::adapter::NormalizedItem;
use crate::etl::Transformer;

use eyre::Result;
use serde_json::{Map, Value};

const ITEM_URL_BASE: &str = "https://maple-data.com";

/// Public URL of a Maple record
pub fn item_url(item_type: ItemType, id: &str) -> String {
    format!("{}/{}/{}", ITEM_URL_BASE, item_type.url_segment(), id)
}

pub fn normalize_customer(customer: ExternalCustomer) -> NormalizedItem {
    let mut data = Map::new();
    data.insert("name".to_string(), Value::String(customer.name));
    data.insert("email".to_string(), Value::String(customer.email));
    if let Some(company) = customer.company {
        data.insert("company".to_string(), Value::String(company));
    }
    data.insert(
        "item_url_field".to_string(),
        Value::String(item_url(ItemType::Customers, &customer.id)),
    );

    NormalizedItem {
        id: customer.id,
        created_date: customer.created_date,
        modified_date: customer.modified_date,
        data: Value::Object(data),
    }
}

pub fn normalize_article(article: ExternalMapleKb) -> NormalizedItem {
    let mut data = Map::new();
    data.insert("title".to_string(), Value::String(article.title));
    data.insert("content".to_string(), Value::String(article.content));
    if let Some(category) = article.category {
        data.insert("category".to_string(), Value::String(category));
    }
    data.insert(
        "item_url_field".to_string(),
        Value::String(item_url(ItemType::MapleKb, &article.id)),
    );

    NormalizedItem {
        id: article.id,
        created_date: article.created_date,
        modified_date: article.modified_date,
        data: Value::Object(data),
    }
}

/// Normalizes customers for the data extraction pipeline
pub struct CustomerNormalizer;

impl Transformer for CustomerNormalizer {
    type Input = ExternalCustomer;
    type Output = NormalizedItem;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        Ok(normalize_customer(input))
    }
}

/// Normalizes knowledge-base articles for the data extraction pipeline
pub struct ArticleNormalizer;

impl Transformer for ArticleNormalizer {
    type Input = ExternalMapleKb;
    type Output = NormalizedItem;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        Ok(normalize_article(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_customer() {
        let item = normalize_customer(ExternalCustomer {
            id: "c-1".to_string(),
            created_date: "2024-01-01T00:00:00Z".to_string(),
            modified_date: "2024-02-01T00:00:00Z".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            company: Some("Analytical Engines".to_string()),
        });

        assert_eq!(item.id, "c-1");
        assert_eq!(item.modified_date, "2024-02-01T00:00:00Z");
        assert_eq!(
            item.data,
            json!({
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "company": "Analytical Engines",
                "item_url_field": "https://maple-data.com/customers/c-1"
            })
        );
    }

    #[test]
    fn test_normalize_customer_without_company() {
        let item = normalize_customer(ExternalCustomer {
            id: "c-2".to_string(),
            created_date: "a".to_string(),
            modified_date: "b".to_string(),
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            company: None,
        });
        assert!(item.data.get("company").is_none());
    }

    #[test]
    fn test_normalize_article_url() {
        let items = ArticleNormalizer
            .transform_many(vec![ExternalMapleKb {
                id: "kb-7".to_string(),
                created_date: "a".to_string(),
                modified_date: "b".to_string(),
                title: "Billing".to_string(),
                content: "# Billing".to_string(),
                category: Some("faq".to_string()),
            }])
            .unwrap();

        assert_eq!(items[0].data["item_url_field"], "https://maple-data.com/kb/kb-7");
        assert_eq!(items[0].data["category"], "faq");
        assert_eq!(items[0].data["content"], "# Billing");
    }
}
