use crate::analytics::client::{ClientError, StreamClient};
use crate::analytics::data_types::*;
use futures::future::try_join_all;
use itertools::Itertools;
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("client error: {0}")]
    ClientError(#[from] ClientError),

    #[error("{0}")]
    AnnotationNotFound(String),

    #[error("no collection specified")]
    NoCollection,
}

type Result<T> = std::result::Result<T, QueryError>;

const BASE_SQL: &str = "select * from streams where collection similar to $1";

/// Selection of streams by collection, tag columns and annotations.
///
/// Values given for one column are OR'ed, distinct columns are AND'ed.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct StreamQuery {
    pub collections: Vec<String>,
    pub tags: Vec<(TagColumn, Vec<String>)>,
    pub annotations: Vec<(String, Vec<String>)>,
}

impl StreamQuery {
    pub fn new<S: ToString>(collection: S) -> Self {
        Self::collections(vec![collection])
    }

    pub fn collections<I, S>(collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            collections: collections.into_iter().map(|c| c.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn tag<I, S>(mut self, column: TagColumn, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.tags
            .push((column, values.into_iter().map(|v| v.to_string()).collect()));
        self
    }

    pub fn annotation<K, I, S>(mut self, key: K, values: I) -> Self
    where
        K: ToString,
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.annotations.push((
            key.to_string(),
            values.into_iter().map(|v| v.to_string()).collect(),
        ));
        self
    }

    /// `SIMILAR TO` pattern matching any of the collections as a substring
    pub fn collection_pattern(&self) -> String {
        self.collections
            .iter()
            .map(|c| format!("%{}%", c))
            .join("|")
    }

    /// statement text and its positional parameters
    pub fn to_sql(&self) -> (String, Vec<String>) {
        let mut sql = BASE_SQL.to_string();
        let mut params = vec![self.collection_pattern()];

        for (column, values) in self.tags.iter() {
            let holders = placeholders(values, &mut params);
            sql.push_str(&format!(" and {} in ({})", column.as_ref(), holders));
        }
        for (key, values) in self.annotations.iter() {
            let holders = placeholders(values, &mut params);
            sql.push_str(&format!(" and annotations -> '{}' in ({})", key, holders));
        }

        (sql, params)
    }

    pub fn matches(&self, metadata: &StreamMetadata) -> bool {
        self.tags.iter().all(|(column, values)| {
            metadata
                .column(*column)
                .map(|v| values.contains(&v))
                .unwrap_or(false)
        }) && self.annotations.iter().all(|(key, values)| {
            metadata
                .annotations
                .get(key)
                .map(|v| values.contains(v))
                .unwrap_or(false)
        })
    }

    /// Fails unless every annotation key is known to every requested collection.
    pub async fn validate_annotations<C: StreamClient + ?Sized>(&self, client: &C) -> Result<()> {
        if self.annotations.is_empty() {
            return Ok(());
        }

        let requested: BTreeSet<&str> = self.annotations.iter().map(|(k, _)| k.as_str()).collect();
        let metadatas = try_join_all(
            self.collections
                .iter()
                .map(|collection| client.collection_metadata(collection)),
        )
        .await?;

        let not_found: Vec<String> = self
            .collections
            .iter()
            .zip(metadatas.iter())
            .filter_map(|(collection, metadata)| {
                let missing: Vec<&str> = requested
                    .iter()
                    .filter(|key| !metadata.annotations.contains_key(**key))
                    .copied()
                    .collect();
                if missing.is_empty() {
                    None
                } else {
                    Some(format!(
                        "{{{}}} not found in collection \"{}\"",
                        missing.iter().map(|k| format!("'{}'", k)).join(", "),
                        collection
                    ))
                }
            })
            .collect();

        if not_found.is_empty() {
            Ok(())
        } else {
            Err(QueryError::AnnotationNotFound(not_found.join(", AND ")))
        }
    }

    pub async fn fetch_metadata<C: StreamClient + ?Sized>(
        &self,
        client: &C,
    ) -> Result<Vec<StreamMetadata>> {
        if self.collections.is_empty() {
            return Err(QueryError::NoCollection);
        }
        self.validate_annotations(client).await?;

        let (sql, params) = self.to_sql();
        log::debug!("stream query: {} {:?}", sql, params);
        Ok(client.query_streams(self).await?)
    }

    pub async fn fetch_uuids<C: StreamClient + ?Sized>(&self, client: &C) -> Result<Vec<Uuid>> {
        let metadata = self.fetch_metadata(client).await?;
        Ok(metadata.into_iter().map(|m| m.uuid).collect())
    }

    pub async fn fetch_streams<C: StreamClient + ?Sized>(&self, client: &C) -> Result<Vec<Stream>> {
        let uuids = self.fetch_uuids(client).await?;
        Ok(client.streams(&uuids).await?)
    }
}

/// pushes `values` onto `params` and returns their `$n` placeholders
fn placeholders(values: &[String], params: &mut Vec<String>) -> String {
    values
        .iter()
        .map(|v| {
            params.push(v.clone());
            format!("${}", params.len())
        })
        .join(",")
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::analytics::client::MemoryClient;

    fn fixture_client() -> MemoryClient {
        MemoryClient::with_streams(vec![
            Stream::new(Uuid::new_v4(), "agave/IC_B/B5", "VPM", "volts")
                .with_annotation("sample_rate", "30"),
            Stream::new(Uuid::new_v4(), "agave/IC_A/A1", "VPM", "volts")
                .with_annotation("sample_rate", "60"),
            Stream::new(Uuid::new_v4(), "agave/IC_A/A1", "IPM", "amps")
                .with_annotation("sample_rate", "60"),
            Stream::new(Uuid::new_v4(), "sunshine/PMU1", "VPM", "volts"),
        ])
    }

    #[test]
    fn test_to_sql() {
        let query = StreamQuery::collections(["agave/IC_B/B5", "agave/IC_A/A1"])
            .tag(TagColumn::Name, ["VPM"])
            .annotation("sample_rate", ["30", "60"]);

        let (sql, params) = query.to_sql();
        assert_eq!(
            sql,
            "select * from streams where collection similar to $1 and name in ($2) and annotations -> 'sample_rate' in ($3,$4)"
        );
        assert_eq!(
            params,
            vec![
                "%agave/IC_B/B5%|%agave/IC_A/A1%".to_string(),
                "VPM".to_string(),
                "30".to_string(),
                "60".to_string(),
            ]
        );

        let (sql, params) = StreamQuery::new("sunshine").to_sql();
        assert_eq!(sql, BASE_SQL);
        assert_eq!(params, vec!["%sunshine%".to_string()]);
    }

    #[tokio::test]
    async fn test_fetch() {
        let client = fixture_client();
        let query = StreamQuery::collections(["agave/IC_B/B5", "agave/IC_A/A1"])
            .tag(TagColumn::Name, ["VPM"])
            .annotation("sample_rate", ["30", "60"]);

        let metadata = query.fetch_metadata(&client).await.unwrap();
        assert_eq!(metadata.len(), 2);

        let streams = query.fetch_streams(&client).await.unwrap();
        let collections: Vec<&str> = streams.iter().map(|s| s.collection.as_str()).collect();
        assert_eq!(collections, vec!["agave/IC_B/B5", "agave/IC_A/A1"]);

        let uuids = StreamQuery::new("agave")
            .tag(TagColumn::Unit, ["amps"])
            .fetch_uuids(&client)
            .await
            .unwrap();
        assert_eq!(uuids.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_by_uuid_and_property_version() {
        let target = Uuid::new_v4();
        let mut revised = Stream::new(Uuid::new_v4(), "sunshine/PMU2", "L1MAG", "volts");
        revised.property_version = 3;
        let client = MemoryClient::with_streams(vec![
            Stream::new(target, "sunshine/PMU1", "L1MAG", "volts"),
            Stream::new(Uuid::new_v4(), "sunshine/PMU1", "C1MAG", "amps"),
            revised.clone(),
        ]);

        let uuids = StreamQuery::new("sunshine")
            .tag(TagColumn::Uuid, [target.to_string()])
            .fetch_uuids(&client)
            .await
            .unwrap();
        assert_eq!(uuids, vec![target]);

        let uuids = StreamQuery::new("sunshine")
            .tag(TagColumn::PropertyVersion, ["3"])
            .fetch_uuids(&client)
            .await
            .unwrap();
        assert_eq!(uuids, vec![revised.uuid]);

        let uuids = StreamQuery::new("sunshine")
            .tag(TagColumn::PropertyVersion, ["0", "3"])
            .tag(TagColumn::Unit, ["volts"])
            .fetch_uuids(&client)
            .await
            .unwrap();
        assert_eq!(uuids.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_annotation() {
        let client = fixture_client();
        let err = StreamQuery::collections(["agave/IC_B/B5", "sunshine/PMU1"])
            .annotation("sample_rate", ["30"])
            .annotation("phase", ["A"])
            .fetch_metadata(&client)
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "{'phase'} not found in collection \"agave/IC_B/B5\", AND {'phase', 'sample_rate'} not found in collection \"sunshine/PMU1\""
        );
    }
}
