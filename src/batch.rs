//! Generation of label instances in bulk, and the edits applied to them between
//! generation and export.

use crate::template::{Elements, LabelInstance, LabelTemplate};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Produces globally unique identifier strings
pub trait IdentifierSource {
    fn next_identifier(&mut self) -> String;
}

/// Random (version 4) UUIDs in their hyphenated form
#[derive(Debug, Default, Copy, Clone)]
pub struct UuidV4;

impl IdentifierSource for UuidV4 {
    fn next_identifier(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Which labels of a batch an edit applies to
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Selection<'a> {
    All,
    /// Labels whose identity key is in the list
    Only(&'a [String]),
}

impl Selection<'_> {
    pub fn contains(&self, id: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(ids) => ids.iter().any(|s| s == id),
        }
    }
}

/// An ordered set of generated labels
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelBatch {
    pub labels: Vec<LabelInstance>,
}

impl LabelBatch {
    /// Create `quantity` labels sharing one template and element layout. Every label
    /// gets a fresh identifier from `ids`, displayed shortened to its first
    /// `short_len` characters, and a fresh identity key. Product names start empty.
    pub fn generate<I: IdentifierSource + ?Sized>(
        quantity: usize,
        template: &LabelTemplate,
        elements: &Elements,
        company_name: &str,
        prefix: &str,
        short_len: usize,
        ids: &mut I,
    ) -> LabelBatch {
        let labels: Vec<LabelInstance> = (0..quantity)
            .map(|_| {
                let identifier = ids.next_identifier();
                let short_identifier = identifier.chars().take(short_len).collect();
                LabelInstance {
                    id: ids.next_identifier(),
                    template: *template,
                    elements: *elements,
                    identifier,
                    short_identifier,
                    company_name: company_name.to_string(),
                    prefix: prefix.to_string(),
                    product_name: String::new(),
                }
            })
            .collect();

        debug!(quantity, short_len, "generated labels");
        LabelBatch { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn as_slice(&self) -> &[LabelInstance] {
        &self.labels
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabelInstance> {
        self.labels.iter()
    }

    pub fn get(&self, id: &str) -> Option<&LabelInstance> {
        self.labels.iter().find(|l| l.id == id)
    }

    /// Replace the label with the same identity key. Returns false when there is
    /// no such label.
    pub fn update_label(&mut self, updated: LabelInstance) -> bool {
        match self.labels.iter_mut().find(|l| l.id == updated.id) {
            Some(label) => {
                *label = updated;
                true
            }
            None => false,
        }
    }

    pub fn update_all<F: FnMut(&mut LabelInstance)>(&mut self, f: F) {
        self.update_where(Selection::All, f);
    }

    /// Apply `f` to each label whose identity key is in `selected`
    pub fn update_selected<F>(&mut self, selected: &[String], f: F)
    where
        F: FnMut(&mut LabelInstance),
    {
        self.update_where(Selection::Only(selected), f);
    }

    fn update_where<F: FnMut(&mut LabelInstance)>(
        &mut self,
        selection: Selection<'_>,
        mut f: F,
    ) -> usize {
        let mut updated = 0;
        for label in self.labels.iter_mut().filter(|l| selection.contains(&l.id)) {
            f(label);
            updated += 1;
        }
        updated
    }

    /// Copy the template, element layout and company name of `source` onto the
    /// selected labels. Each label keeps its own identifiers and product name.
    /// Returns how many labels changed.
    pub fn apply_layout(&mut self, selection: Selection<'_>, source: &LabelInstance) -> usize {
        let updated = self.update_where(selection, |label| {
            label.template = source.template;
            label.elements = source.elements;
            label.company_name.clone_from(&source.company_name);
        });
        debug!(updated, source = %source.id, "applied label layout");
        updated
    }
}

impl<'a> IntoIterator for &'a LabelBatch {
    type Item = &'a LabelInstance;
    type IntoIter = std::slice::Iter<'a, LabelInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.labels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    /// Hands out "id-0", "id-1", ...
    struct Counter(usize);

    impl IdentifierSource for Counter {
        fn next_identifier(&mut self) -> String {
            let id = format!("id-{}", self.0);
            self.0 += 1;
            id
        }
    }

    fn batch(quantity: usize) -> LabelBatch {
        LabelBatch::generate(
            quantity,
            &LabelTemplate::default(),
            &Elements::default(),
            "ACME",
            "https://acme.test/",
            3,
            &mut Counter(0),
        )
    }

    #[test]
    fn generates_distinct_labels() {
        let batch = batch(3);
        assert_eq!(batch.len(), 3);
        let first = &batch.labels[0];
        assert_eq!(first.identifier, "id-0");
        assert_eq!(first.id, "id-1");
        assert_eq!(first.short_identifier, "id-");
        assert_eq!(first.qr_payload(), "https://acme.test/id-0");
        assert!(first.product_name.is_empty());
        assert_eq!(batch.labels[2].identifier, "id-4");
    }

    #[test]
    fn uuids_are_unique_and_shortened() {
        let batch = LabelBatch::generate(
            2,
            &LabelTemplate::default(),
            &Elements::default(),
            "ACME",
            "",
            8,
            &mut UuidV4,
        );
        let a = &batch.labels[0];
        let b = &batch.labels[1];
        assert_ne!(a.identifier, b.identifier);
        assert_ne!(a.id, a.identifier);
        assert_eq!(a.identifier.len(), 36);
        assert_eq!(a.short_identifier, a.identifier[..8]);
    }

    #[test]
    fn short_length_longer_than_identifier_keeps_everything() {
        let batch = LabelBatch::generate(
            1,
            &LabelTemplate::default(),
            &Elements::default(),
            "ACME",
            "",
            100,
            &mut Counter(7),
        );
        assert_eq!(batch.labels[0].short_identifier, "id-7");
    }

    #[test]
    fn update_label_replaces_by_identity() {
        let mut batch = batch(2);
        let mut label = batch.labels[1].clone();
        label.product_name = "Widget".to_string();
        assert!(batch.update_label(label));
        assert_eq!(batch.get("id-3").unwrap().product_name, "Widget");
        assert!(batch.labels[0].product_name.is_empty());

        let mut stranger = batch.labels[0].clone();
        stranger.id = "nobody".to_string();
        assert!(!batch.update_label(stranger));
    }

    #[test]
    fn bulk_updates() {
        let mut batch = batch(3);
        batch.update_all(|l| l.prefix = "P-".to_string());
        assert!(batch.iter().all(|l| l.prefix == "P-"));

        let selected = vec!["id-1".to_string(), "id-5".to_string()];
        batch.update_selected(&selected, |l| l.product_name = "Bolt".to_string());
        let names: Vec<&str> = batch.iter().map(|l| l.product_name.as_str()).collect();
        assert_eq!(names, ["Bolt", "", "Bolt"]);
    }

    #[test]
    fn applying_a_layout_keeps_each_labels_own_text() {
        let mut batch = batch(3);
        batch.update_all(|l| l.product_name = l.identifier.clone());

        let mut source = batch.labels[0].clone();
        source.template = LabelTemplate::new(2.0, 1.0, Unit::Inch);
        source.elements.qr_code.size = 80.0;
        source.company_name = "Globex".to_string();
        source.product_name = "ignored".to_string();

        let selected = vec!["id-3".to_string()];
        let updated = batch.apply_layout(Selection::Only(&selected), &source);
        assert_eq!(updated, 1);

        let changed = batch.get("id-3").unwrap();
        assert_eq!(changed.template.unit, Unit::Inch);
        assert_eq!(changed.elements.qr_code.size, 80.0);
        assert_eq!(changed.company_name, "Globex");
        assert_eq!(changed.product_name, "id-2");
        assert_eq!(changed.identifier, "id-2");
        assert_eq!(batch.get("id-1").unwrap().company_name, "ACME");

        assert_eq!(batch.apply_layout(Selection::All, &source), 3);
        assert!(batch.iter().all(|l| l.company_name == "Globex"));
    }
}
