//! Per-library repository: partitions, search, and direct lookup (spec §4.11).
//!
//! One [`Repository`] is built per configured library by the manager. It
//! owns the library's fully loaded documents and a BM25 index per version
//! partition, and is the thing `search`/`by-id` tool calls ultimately run
//! against.

use std::collections::BTreeSet;

use crate::assembler;
use crate::bm25::Bm25Index;
use crate::error::{Error, Result};
use crate::fetcher::Fetcher;
use crate::index_parser;
use crate::loader;
use crate::reweight;
use crate::synonyms;
use crate::types::{Document, DocVersion, SearchMode};

/// Which version partition to search. `llms.txt` documents with no
/// inferable version are only reachable via [`Partition::All`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    V1,
    V2,
    /// Every document regardless of inferred version.
    All,
}

/// A fully loaded documentation library: its documents and one BM25 index
/// per version partition (spec §4.11: "one BM25 index per partition").
pub struct Repository {
    documents: Vec<Document>,
    v1_index: Bm25Index,
    v2_index: Bm25Index,
    all_index: Bm25Index,
}

impl Repository {
    /// Fetches the library's `llms.txt` index, loads every referenced
    /// document, and builds the version-partitioned BM25 indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Network`]/[`Error::InvalidUrl`] if the index itself
    /// cannot be fetched.
    pub async fn build(fetcher: &Fetcher, index_url: &str) -> Result<Self> {
        let index_body = fetcher.fetch(index_url).await?;
        let raw_docs = index_parser::parse(&index_body, index_url);
        let documents = loader::load(fetcher, &raw_docs).await;
        Ok(Self::from_documents(documents))
    }

    /// Builds a repository directly from already-loaded documents, mainly
    /// for tests that don't want to exercise the network path.
    #[must_use]
    pub fn from_documents(documents: Vec<Document>) -> Self {
        let v1_chunks = chunks_in_partition(&documents, Some(DocVersion::V1));
        let v2_chunks = chunks_in_partition(&documents, Some(DocVersion::V2));
        let all_chunks = documents.iter().flat_map(|d| d.chunks.clone()).collect::<Vec<_>>();

        Self {
            v1_index: Bm25Index::build(v1_chunks),
            v2_index: Bm25Index::build(v2_chunks),
            all_index: Bm25Index::build(all_chunks),
            documents,
        }
    }

    /// Number of loaded documents.
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Every keyword registered across documents in `partition`.
    #[must_use]
    pub fn all_keywords(&self, partition: Partition) -> BTreeSet<String> {
        self.documents
            .iter()
            .filter(|d| partition_matches(d.version, partition))
            .flat_map(|d| d.keywords.iter().cloned())
            .collect()
    }

    /// Runs synonym expansion, BM25, category reweighting, and assembly
    /// over `partition`, returning the final text payload.
    #[must_use]
    pub fn search(&self, partition: Partition, keywords: &[String], mode: SearchMode, max_tokens: u32) -> String {
        let index = self.index_for(partition);
        if index.is_empty() {
            return String::new();
        }

        let expanded = synonyms::convert(keywords);
        let query_terms: Vec<String> = expanded.iter().flat_map(|t| crate::bm25::tokenize(t)).collect();

        let hits = index.search(&query_terms, mode);
        let reweighted = reweight::reweight(hits, |id| {
            self.documents
                .iter()
                .find(|d| d.id == id)
                .map_or(crate::types::Category::Unknown, |d| d.category)
        });

        assembler::normalize(&reweighted, max_tokens, |id| self.document(id).cloned())
    }

    /// Direct lookup of a document by its dense id (spec §4.11 `byId`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DocumentNotFound`] if `id` is out of range.
    pub fn by_id(&self, library_id: &str, id: u32) -> Result<&Document> {
        self.document(id).ok_or_else(|| Error::DocumentNotFound {
            library_id: library_id.to_string(),
            id,
        })
    }

    fn document(&self, id: u32) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    fn index_for(&self, partition: Partition) -> &Bm25Index {
        match partition {
            Partition::V1 => &self.v1_index,
            Partition::V2 => &self.v2_index,
            Partition::All => &self.all_index,
        }
    }
}

fn chunks_in_partition(documents: &[Document], version: Option<DocVersion>) -> Vec<crate::types::DocumentChunk> {
    documents
        .iter()
        .filter(|d| d.version == version)
        .flat_map(|d| d.chunks.clone())
        .collect()
}

fn partition_matches(doc_version: Option<DocVersion>, partition: Partition) -> bool {
    match partition {
        Partition::V1 => doc_version == Some(DocVersion::V1),
        Partition::V2 => doc_version == Some(DocVersion::V2),
        Partition::All => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, DocumentChunk};

    fn doc(id: u32, version: Option<DocVersion>, category: Category, text: &str) -> Document {
        Document {
            id,
            version,
            category,
            title: format!("Doc {id}"),
            link: "https://example.com".into(),
            keywords: BTreeSet::from([format!("kw{id}")]),
            chunks: vec![DocumentChunk {
                id,
                chunk_id: id * 1000,
                origin_title: format!("Doc {id}"),
                text: text.to_string(),
                raw_text: text.to_string(),
                word_count: text.split_whitespace().count() as u32,
                estimated_tokens: crate::token::estimate(text),
                header_stack: vec![],
            }],
        }
    }

    #[test]
    fn v1_and_v2_partitions_are_wired_from_their_own_documents() {
        let repo = Repository::from_documents(vec![
            doc(0, Some(DocVersion::V1), Category::Guides, "widgets are great"),
            doc(1, Some(DocVersion::V2), Category::Guides, "gizmos are better"),
        ]);

        let v1_keywords = repo.all_keywords(Partition::V1);
        let v2_keywords = repo.all_keywords(Partition::V2);
        assert!(v1_keywords.contains("kw0"));
        assert!(!v1_keywords.contains("kw1"));
        assert!(v2_keywords.contains("kw1"));
        assert!(!v2_keywords.contains("kw0"));
    }

    #[test]
    fn search_on_empty_partition_returns_empty_string() {
        let repo = Repository::from_documents(vec![doc(0, Some(DocVersion::V1), Category::Guides, "widgets")]);
        let result = repo.search(Partition::V2, &["widgets".to_string()], SearchMode::Balanced, 1000);
        assert_eq!(result, "");
    }

    #[test]
    fn search_finds_matching_document_and_includes_its_header() {
        let repo = Repository::from_documents(vec![doc(0, Some(DocVersion::V1), Category::Guides, "widgets are great for payments")]);
        let result = repo.search(Partition::V1, &["widgets".to_string()], SearchMode::Balanced, 1000);
        assert!(result.contains("Original Document ID: 0"));
    }

    #[test]
    fn by_id_out_of_range_returns_document_not_found() {
        let repo = Repository::from_documents(vec![doc(0, Some(DocVersion::V1), Category::Guides, "widgets")]);
        let err = repo.by_id("react", 5).unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound { id: 5, .. }));
    }

    #[test]
    fn by_id_in_range_returns_the_document() {
        let repo = Repository::from_documents(vec![doc(0, Some(DocVersion::V1), Category::Guides, "widgets")]);
        let found = repo.by_id("react", 0).unwrap();
        assert_eq!(found.id, 0);
    }
}
