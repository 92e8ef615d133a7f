//! Document-level types and the word arena.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::word::local_id;
use super::{
    page_image_key, Annotation, AnnotationId, Attributes, BoundingBox, Page, PageImage,
    PageImageSource, Region, RegionId, Word, WordId,
};
use crate::error::{Error, Result};

/// An Image Markup document.
///
/// The document owns its pages, and through them its words. Words live in
/// an arena indexed by [`WordId`]; text stream links are stored as arena
/// indices, so following `next` never touches ownership.
#[derive(Debug, Serialize)]
pub struct Document {
    /// Document identifier
    pub doc_id: String,

    /// Generic document attributes
    pub attributes: Attributes,

    pages: BTreeMap<u32, Page>,
    words: Vec<Word>,
    regions: Vec<Region>,
    annotations: Vec<Annotation>,

    #[serde(skip)]
    word_index: HashMap<String, WordId>,
    #[serde(skip)]
    page_images: BTreeMap<u32, PageImage>,
    #[serde(skip)]
    image_source: Option<Box<dyn PageImageSource>>,
}

impl Document {
    /// Create a new empty document.
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            attributes: Attributes::new(),
            pages: BTreeMap::new(),
            words: Vec::new(),
            regions: Vec::new(),
            annotations: Vec::new(),
            word_index: HashMap::new(),
            page_images: BTreeMap::new(),
            image_source: None,
        }
    }

    // ----------------------------------------------------------------------
    // Pages
    // ----------------------------------------------------------------------

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Create a page and register it with the document.
    pub fn add_page(&mut self, id: u32, bounds: BoundingBox) -> Result<&mut Page> {
        if self.pages.contains_key(&id) {
            return Err(Error::DuplicatePage(id));
        }
        Ok(self.pages.entry(id).or_insert_with(|| Page::new(id, bounds)))
    }

    /// Get a page by ID.
    pub fn page(&self, id: u32) -> Option<&Page> {
        self.pages.get(&id)
    }

    /// Get a page by ID for modification.
    pub fn page_mut(&mut self, id: u32) -> Option<&mut Page> {
        self.pages.get_mut(&id)
    }

    /// Iterate over pages in ID order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.values()
    }

    // ----------------------------------------------------------------------
    // Words
    // ----------------------------------------------------------------------

    /// Create a word on a page. The new word forms a one-word text stream.
    pub fn add_word(
        &mut self,
        page_id: u32,
        bounds: BoundingBox,
        string: impl Into<String>,
    ) -> Result<WordId> {
        let page = self
            .pages
            .get_mut(&page_id)
            .ok_or(Error::PageNotFound(page_id))?;

        let key = local_id(page_id, &bounds);
        if self.word_index.contains_key(&key) {
            return Err(Error::DuplicateWord(key));
        }

        let id = WordId(self.words.len());
        self.words.push(Word::new(id, page_id, bounds, string.into()));
        page.words.push(id);
        self.word_index.insert(key, id);
        Ok(id)
    }

    /// Get a word. Panics if the ID belongs to another document.
    pub fn word(&self, id: WordId) -> &Word {
        &self.words[id.0]
    }

    /// Get a word for modification of its content fields.
    pub fn word_mut(&mut self, id: WordId) -> &mut Word {
        &mut self.words[id.0]
    }

    /// Look up a word by its local ID.
    pub fn word_by_local_id(&self, local_id: &str) -> Option<WordId> {
        self.word_index.get(local_id).copied()
    }

    /// Total number of words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Iterate over all words in creation order.
    pub fn words(&self) -> impl Iterator<Item = (WordId, &Word)> {
        self.words.iter().enumerate().map(|(i, w)| (WordId(i), w))
    }

    /// Predecessor of a word in its text stream.
    pub fn previous_word(&self, id: WordId) -> Option<WordId> {
        self.words[id.0].prev
    }

    /// Successor of a word in its text stream.
    pub fn next_word(&self, id: WordId) -> Option<WordId> {
        self.words[id.0].next
    }

    /// Set (or clear) the successor of `word`.
    ///
    /// The former successor of `word` and the former predecessor of `next`
    /// lose their links to them; the former successor becomes the head of a
    /// new stream that inherits the stream type. Fails without changes if
    /// the link would close a loop.
    pub fn set_next_word(&mut self, word: WordId, next: Option<WordId>) -> Result<()> {
        let Some(next) = next else {
            self.cut_after(word);
            return Ok(());
        };

        if self.words[word.0].next == Some(next) {
            return Ok(());
        }
        if self.reaches(next, word) {
            return Err(Error::StreamCycle {
                from: self.words[word.0].local_id(),
                to: self.words[next.0].local_id(),
            });
        }

        let old_next = self.words[word.0].next;
        if let Some(old_prev) = self.words[next.0].prev {
            self.words[old_prev.0].next = None;
        }
        if let Some(old_next) = old_next {
            self.detach_head(old_next, word);
        }

        self.words[word.0].next = Some(next);
        self.words[next.0].prev = Some(word);

        if let Some(old_next) = old_next {
            self.renumber(old_next);
        }
        self.renumber(word);
        Ok(())
    }

    /// Set (or clear) the predecessor of `word`.
    pub fn set_previous_word(&mut self, word: WordId, previous: Option<WordId>) -> Result<()> {
        match previous {
            Some(previous) => self.set_next_word(previous, Some(word)),
            None => {
                if let Some(previous) = self.words[word.0].prev {
                    self.cut_after(previous);
                }
                Ok(())
            }
        }
    }

    /// Type of the text stream a word belongs to.
    pub fn text_stream_type(&self, id: WordId) -> &str {
        let head = self.words[id.0].stream_head;
        &self.words[head.0].stream_type
    }

    /// Set the type of the text stream a word belongs to.
    pub fn set_text_stream_type(&mut self, id: WordId, stream_type: impl Into<String>) {
        let head = self.words[id.0].stream_head;
        self.words[head.0].stream_type = stream_type.into();
    }

    /// Check whether following `next` from `from` arrives at `to`
    /// (including `from == to`).
    pub(crate) fn reaches(&self, from: WordId, to: WordId) -> bool {
        let a = &self.words[from.0];
        let b = &self.words[to.0];
        a.stream_head == b.stream_head && a.stream_pos <= b.stream_pos
    }

    fn cut_after(&mut self, word: WordId) {
        if let Some(old_next) = self.words[word.0].next.take() {
            self.detach_head(old_next, word);
            self.renumber(old_next);
        }
    }

    /// Make `word` a stream head that inherits the type of `origin`'s stream.
    fn detach_head(&mut self, word: WordId, origin: WordId) {
        let inherited = self.text_stream_type(origin).to_string();
        let w = &mut self.words[word.0];
        w.prev = None;
        w.stream_type = inherited;
    }

    /// Recompute stream ID and positions of the stream containing `word`.
    /// Only the head keeps a stream type.
    fn renumber(&mut self, word: WordId) {
        let mut head = word;
        while let Some(prev) = self.words[head.0].prev {
            head = prev;
        }

        let mut cursor = Some(head);
        let mut pos = 0;
        while let Some(current) = cursor {
            let w = &mut self.words[current.0];
            w.stream_head = head;
            w.stream_pos = pos;
            if pos > 0 {
                w.stream_type.clear();
            }
            pos += 1;
            cursor = w.next;
        }
    }

    /// Link two words without maintaining stream bookkeeping. Callers must
    /// finish with [`Document::rebuild_streams`].
    pub(crate) fn link_unchecked(&mut self, word: WordId, next: WordId) {
        if let Some(old_next) = self.words[word.0].next {
            if old_next != next {
                self.words[old_next.0].prev = None;
            }
        }
        if let Some(old_prev) = self.words[next.0].prev {
            if old_prev != word {
                self.words[old_prev.0].next = None;
            }
        }
        self.words[word.0].next = Some(next);
        self.words[next.0].prev = Some(word);
    }

    /// Recompute stream IDs and positions of all words, failing if the
    /// links contain a loop.
    pub(crate) fn rebuild_streams(&mut self) -> Result<()> {
        let mut seen = vec![false; self.words.len()];

        for start in 0..self.words.len() {
            if self.words[start].prev.is_some() {
                continue;
            }
            let head = WordId(start);
            let mut cursor = Some(head);
            let mut pos = 0;
            while let Some(current) = cursor {
                seen[current.0] = true;
                let w = &mut self.words[current.0];
                w.stream_head = head;
                w.stream_pos = pos;
                if pos > 0 {
                    w.stream_type.clear();
                }
                pos += 1;
                cursor = w.next;
            }
        }

        if let Some(looped) = seen.iter().position(|seen| !seen) {
            return Err(Error::Format(format!(
                "text stream loop through word {}",
                self.words[looped].local_id()
            )));
        }
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Regions and annotations
    // ----------------------------------------------------------------------

    /// Add a region. Its page must exist.
    pub fn add_region(&mut self, region: Region) -> Result<RegionId> {
        if !self.pages.contains_key(&region.page_id) {
            return Err(Error::PageNotFound(region.page_id));
        }
        self.regions.push(region);
        Ok(self.regions.len() - 1)
    }

    /// All regions in insertion order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Get a region for modification.
    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(id)
    }

    /// Regions on one page.
    pub fn page_regions(&self, page_id: u32) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(move |r| r.page_id == page_id)
    }

    /// Annotate the words from `first` to `last`.
    ///
    /// Reversed arguments are swapped. Returns `None` if the words lie in
    /// different text streams.
    pub fn add_annotation(
        &mut self,
        first: WordId,
        last: WordId,
        annotation_type: impl Into<String>,
    ) -> Option<AnnotationId> {
        let (a, b) = (&self.words[first.0], &self.words[last.0]);
        if a.stream_head != b.stream_head {
            log::debug!(
                "Not annotating {} to {}: different text streams",
                a.local_id(),
                b.local_id()
            );
            return None;
        }
        let (first, last) = if a.stream_pos > b.stream_pos {
            (last, first)
        } else {
            (first, last)
        };

        self.annotations.push(Annotation {
            first_word: first,
            last_word: last,
            annotation_type: annotation_type.into(),
            attributes: Attributes::new(),
        });
        Some(self.annotations.len() - 1)
    }

    /// All annotations in insertion order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Get an annotation.
    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(id)
    }

    /// Get an annotation for modification.
    pub fn annotation_mut(&mut self, id: AnnotationId) -> Option<&mut Annotation> {
        self.annotations.get_mut(id)
    }

    // ----------------------------------------------------------------------
    // Page images
    // ----------------------------------------------------------------------

    /// Store the image of a page.
    pub fn set_page_image(&mut self, page_id: u32, image: PageImage) -> Result<()> {
        if !self.pages.contains_key(&page_id) {
            return Err(Error::PageNotFound(page_id));
        }
        self.page_images.insert(page_id, image);
        Ok(())
    }

    /// Get the image of a page, from the stored images first and then from
    /// the image source.
    pub fn page_image(&self, page_id: u32) -> Result<Option<PageImage>> {
        if let Some(image) = self.page_images.get(&page_id) {
            return Ok(Some(image.clone()));
        }
        match self.image_source {
            Some(ref source) => source.fetch(&page_image_key(&self.doc_id, page_id)),
            None => Ok(None),
        }
    }

    /// Install the provider consulted for pages without a stored image.
    pub fn set_image_source(&mut self, source: Box<dyn PageImageSource>) {
        self.image_source = Some(source);
    }

    /// Check whether an image provider is installed.
    pub fn has_image_source(&self) -> bool {
        self.image_source.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageFormat;

    fn doc_with_words(count: i32) -> (Document, Vec<WordId>) {
        let mut doc = Document::new("test");
        doc.add_page(0, BoundingBox::new(0, 1000, 0, 1000)).unwrap();
        let ids = (0..count)
            .map(|i| {
                doc.add_word(0, BoundingBox::new(i * 50, i * 50 + 40, 0, 20), format!("w{}", i))
                    .unwrap()
            })
            .collect();
        (doc, ids)
    }

    fn chain(doc: &mut Document, ids: &[WordId]) {
        for pair in ids.windows(2) {
            doc.set_next_word(pair[0], Some(pair[1])).unwrap();
        }
    }

    #[test]
    fn test_document_new() {
        let doc = Document::new("doc");
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.word_count(), 0);
    }

    #[test]
    fn test_add_word_requires_page_and_unique_id() {
        let mut doc = Document::new("doc");
        let bounds = BoundingBox::new(0, 10, 0, 10);
        assert!(matches!(
            doc.add_word(1, bounds, "x"),
            Err(Error::PageNotFound(1))
        ));

        doc.add_page(1, BoundingBox::new(0, 100, 0, 100)).unwrap();
        assert!(matches!(
            doc.add_page(1, BoundingBox::new(0, 100, 0, 100)),
            Err(Error::DuplicatePage(1))
        ));

        let id = doc.add_word(1, bounds, "x").unwrap();
        assert_eq!(doc.word_by_local_id("1.[0,10,0,10]"), Some(id));
        assert!(matches!(
            doc.add_word(1, bounds, "y"),
            Err(Error::DuplicateWord(_))
        ));
        assert_eq!(doc.page(1).unwrap().words(), &[id]);
    }

    #[test]
    fn test_linking_updates_stream_positions() {
        let (mut doc, ids) = doc_with_words(4);
        chain(&mut doc, &ids);

        for (pos, &id) in ids.iter().enumerate() {
            assert_eq!(doc.word(id).text_stream_id(), ids[0]);
            assert_eq!(doc.word(id).text_stream_pos(), pos);
        }
        assert_eq!(doc.previous_word(ids[2]), Some(ids[1]));
        assert_eq!(doc.next_word(ids[3]), None);
    }

    #[test]
    fn test_cycle_is_refused() {
        let (mut doc, ids) = doc_with_words(3);
        chain(&mut doc, &ids);

        let err = doc.set_next_word(ids[2], Some(ids[0])).unwrap_err();
        assert!(matches!(err, Error::StreamCycle { .. }));
        assert!(doc.set_next_word(ids[1], Some(ids[1])).is_err());
        // unchanged
        assert_eq!(doc.next_word(ids[2]), None);
        assert_eq!(doc.previous_word(ids[0]), None);
    }

    #[test]
    fn test_split_inherits_stream_type() {
        let (mut doc, ids) = doc_with_words(4);
        chain(&mut doc, &ids);
        doc.set_text_stream_type(ids[2], "footnote");
        assert_eq!(doc.text_stream_type(ids[0]), "footnote");

        doc.set_previous_word(ids[2], None).unwrap();
        assert_eq!(doc.next_word(ids[1]), None);
        assert_eq!(doc.word(ids[3]).text_stream_id(), ids[2]);
        assert_eq!(doc.word(ids[3]).text_stream_pos(), 1);
        assert_eq!(doc.text_stream_type(ids[3]), "footnote");
    }

    #[test]
    fn test_joined_head_drops_its_stream_type() {
        let (mut doc, ids) = doc_with_words(3);
        chain(&mut doc, &ids[..2]);
        doc.set_text_stream_type(ids[2], "footnote");

        doc.set_next_word(ids[1], Some(ids[2])).unwrap();
        assert_eq!(doc.text_stream_type(ids[2]), "main text");
        assert!(doc.word(ids[2]).stream_type.is_empty());
        assert!(doc.word(ids[1]).stream_type.is_empty());

        // split off again, the stream type comes from the old stream
        doc.set_previous_word(ids[2], None).unwrap();
        assert_eq!(doc.text_stream_type(ids[2]), "main text");
    }

    #[test]
    fn test_relinking_cuts_old_neighbors() {
        let (mut doc, ids) = doc_with_words(5);
        chain(&mut doc, &ids[..3]);
        chain(&mut doc, &ids[3..]);

        // w0 -> w4 : w1 w2 split off, w3 loses its successor
        doc.set_next_word(ids[0], Some(ids[4])).unwrap();
        assert_eq!(doc.next_word(ids[0]), Some(ids[4]));
        assert_eq!(doc.previous_word(ids[1]), None);
        assert_eq!(doc.next_word(ids[3]), None);
        assert_eq!(doc.word(ids[4]).text_stream_id(), ids[0]);
        assert_eq!(doc.word(ids[2]).text_stream_id(), ids[1]);
        assert_eq!(doc.word(ids[2]).text_stream_pos(), 1);
    }

    #[test]
    fn test_rebuild_streams_detects_loop() {
        let (mut doc, ids) = doc_with_words(3);
        doc.link_unchecked(ids[0], ids[1]);
        doc.link_unchecked(ids[1], ids[2]);
        doc.rebuild_streams().unwrap();
        assert_eq!(doc.word(ids[2]).text_stream_pos(), 2);

        doc.link_unchecked(ids[2], ids[0]);
        assert!(matches!(doc.rebuild_streams(), Err(Error::Format(_))));
    }

    #[test]
    fn test_annotation_swaps_and_rejects_foreign_streams() {
        let (mut doc, ids) = doc_with_words(4);
        chain(&mut doc, &ids[..3]);

        let id = doc.add_annotation(ids[2], ids[0], "heading").unwrap();
        let annotation = doc.annotation(id).unwrap();
        assert_eq!(annotation.first_word, ids[0]);
        assert_eq!(annotation.last_word, ids[2]);

        assert_eq!(doc.add_annotation(ids[0], ids[3], "heading"), None);
    }

    #[test]
    fn test_page_image_lookup() {
        let (mut doc, _) = doc_with_words(1);
        assert!(doc.page_image(0).unwrap().is_none());

        let image = PageImage::new(vec![1, 2, 3], ImageFormat::Png);
        doc.set_page_image(0, image.clone()).unwrap();
        assert_eq!(doc.page_image(0).unwrap(), Some(image));
        assert!(doc.set_page_image(9, PageImage::detect(vec![])).is_err());
    }
}
