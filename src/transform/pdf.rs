//! PDF transform engine backed by lopdf.

use super::office::LibreOffice;
use super::TransformService;
use crate::detect;
use crate::document::DocumentHandle;
use crate::error::{Error, Result};
use lopdf::{Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The default [`TransformService`]: lopdf for page manipulation, an
/// optional LibreOffice installation for DOCX conversion.
pub struct PdfTransformService {
    office: Option<LibreOffice>,
}

impl PdfTransformService {
    /// Create a service, probing once for an office converter.
    pub fn new() -> Self {
        let office = LibreOffice::discover();
        if office.is_none() {
            log::debug!("no LibreOffice found; DOCX conversion disabled");
        }
        Self { office }
    }

    /// Create a service with DOCX conversion disabled.
    pub fn without_office() -> Self {
        Self { office: None }
    }

    fn load(&self, doc: &DocumentHandle) -> Result<Document> {
        let data = match doc {
            DocumentHandle::Path(path) => {
                if !path.exists() {
                    return Err(Error::NotFound(path.clone()));
                }
                fs::read(path)?
            }
            DocumentHandle::Buffer(data) => data.clone(),
        };
        detect::pdf_version(&data)?;
        Ok(Document::load_mem(&data)?)
    }

    fn office(&self) -> Result<&LibreOffice> {
        self.office.as_ref().ok_or_else(|| {
            Error::ConversionUnsupported(
                "no LibreOffice installation found (set PDFCHAIN_SOFFICE to override)".into(),
            )
        })
    }
}

impl Default for PdfTransformService {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformService for PdfTransformService {
    fn page_count(&self, doc: &DocumentHandle) -> Result<usize> {
        Ok(self.load(doc)?.get_pages().len())
    }

    fn extract_subrange(&self, doc: &DocumentHandle, start: u32, end: u32) -> Result<Vec<u8>> {
        let mut document = self.load(doc)?;
        let pages = document.get_pages();
        if start < 1 || end < start || end as usize > pages.len() {
            return Err(Error::InvalidPageRange(format!(
                "{}-{} of a {}-page document",
                start,
                end,
                pages.len()
            )));
        }

        let to_delete: Vec<u32> = pages
            .keys()
            .copied()
            .filter(|page| *page < start || *page > end)
            .collect();
        document.delete_pages(&to_delete);
        document.prune_objects();
        document.renumber_objects();
        document.compress();
        serialize(&mut document)
    }

    fn concatenate(&self, docs: &[DocumentHandle]) -> Result<Vec<u8>> {
        let documents = docs
            .iter()
            .map(|handle| self.load(handle))
            .collect::<Result<Vec<_>>>()?;
        let mut merged = merge_documents(documents)?;
        serialize(&mut merged)
    }

    fn recompress(&self, doc: &DocumentHandle) -> Result<Vec<u8>> {
        let mut document = self.load(doc)?;
        document.prune_objects();
        document.compress();
        serialize(&mut document)
    }

    fn convert_to_docx(&self, doc: &DocumentHandle, output: &Path) -> Result<()> {
        let office = self.office()?;
        let staging = tempfile::tempdir()?;

        // soffice wants a file on disk; stage buffer-backed handles.
        let input = match doc.path() {
            Some(path) => path.to_path_buf(),
            None => {
                let staged = staging.path().join("input.pdf");
                doc.save(&staged)?;
                staged
            }
        };

        let produced = office.convert(&input, "docx", staging.path())?;
        fs::copy(&produced, output)?;
        Ok(())
    }

    fn convert_from_docx(&self, input: &Path) -> Result<Vec<u8>> {
        if !input.exists() {
            return Err(Error::NotFound(input.to_path_buf()));
        }
        let office = self.office()?;
        let staging = tempfile::tempdir()?;
        let produced = office.convert(input, "pdf", staging.path())?;
        let data = fs::read(&produced)?;
        detect::pdf_version(&data)?;
        Ok(data)
    }

    fn supports_office_conversion(&self) -> bool {
        self.office.is_some()
    }
}

fn serialize(document: &mut Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Merge the page trees of `documents` into a single document, in order.
///
/// Each source is renumbered above the running `max_id` so object ids never
/// collide, then all `Page` objects are re-parented under one synthesized
/// `Pages` node referenced by a single catalog. Outlines are dropped; they
/// would dangle across documents.
fn merge_documents(documents: Vec<Document>) -> Result<Document> {
    let mut max_id = 1;
    let mut documents_pages: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut documents_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut merged = Document::with_version("1.5");

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        for (_, object_id) in doc.get_pages() {
            let object = doc.get_object(object_id)?.to_owned();
            documents_pages.insert(object_id, object);
        }
        documents_objects.extend(doc.objects);
    }

    let mut catalog_object: Option<(ObjectId, Object)> = None;
    let mut pages_object: Option<(ObjectId, Object)> = None;

    for (object_id, object) in documents_objects.iter() {
        match object.type_name().unwrap_or(b"") {
            b"Catalog" => {
                // keep the first catalog id, the dictionary is rebuilt below
                catalog_object = Some((
                    catalog_object.map(|(id, _)| id).unwrap_or(*object_id),
                    object.clone(),
                ));
            }
            b"Pages" => {
                if let Ok(dictionary) = object.as_dict() {
                    let mut dictionary = dictionary.clone();
                    if let Some((_, ref existing)) = pages_object {
                        if let Ok(existing) = existing.as_dict() {
                            dictionary.extend(existing);
                        }
                    }
                    pages_object = Some((
                        pages_object.map(|(id, _)| id).unwrap_or(*object_id),
                        Object::Dictionary(dictionary),
                    ));
                }
            }
            // Pages are re-inserted below with a fixed-up Parent.
            b"Page" => {}
            // Outline trees from the sources would reference dropped ids.
            b"Outlines" | b"Outline" => {}
            _ => {
                merged.objects.insert(*object_id, object.clone());
            }
        }
    }

    let (pages_id, pages_root) = pages_object
        .ok_or_else(|| Error::UnreadableDocument("no page tree root found".into()))?;
    let (catalog_id, catalog_root) = catalog_object
        .ok_or_else(|| Error::UnreadableDocument("no document catalog found".into()))?;

    for (object_id, object) in documents_pages.iter() {
        if let Ok(dictionary) = object.as_dict() {
            let mut dictionary = dictionary.clone();
            dictionary.set("Parent", pages_id);
            merged.objects.insert(*object_id, Object::Dictionary(dictionary));
        }
    }

    if let Ok(dictionary) = pages_root.as_dict() {
        let mut dictionary = dictionary.clone();
        dictionary.set("Count", documents_pages.len() as u32);
        dictionary.set(
            "Kids",
            documents_pages
                .keys()
                .map(|object_id| Object::Reference(*object_id))
                .collect::<Vec<_>>(),
        );
        merged.objects.insert(pages_id, Object::Dictionary(dictionary));
    }

    if let Ok(dictionary) = catalog_root.as_dict() {
        let mut dictionary = dictionary.clone();
        dictionary.set("Pages", pages_id);
        dictionary.remove(b"Outlines");
        merged.objects.insert(catalog_id, Object::Dictionary(dictionary));
    }

    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.len() as u32;
    merged.renumber_objects();
    merged.prune_objects();
    merged.compress();
    Ok(merged)
}

/// Build a minimal n-page PDF for tests elsewhere in the crate.
#[cfg(test)]
pub(crate) fn test_pdf_bytes(pages: usize) -> Vec<u8> {
    use lopdf::dictionary;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            })
            .into()
        })
        .collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as u32,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(pages: usize) -> DocumentHandle {
        DocumentHandle::from_bytes(test_pdf_bytes(pages))
    }

    #[test]
    fn test_page_count() {
        let service = PdfTransformService::without_office();
        assert_eq!(service.page_count(&handle(3)).unwrap(), 3);
        assert_eq!(service.page_count(&handle(1)).unwrap(), 1);
    }

    #[test]
    fn test_open_rejects_non_pdf() {
        let service = PdfTransformService::without_office();
        let garbage = DocumentHandle::from_bytes(b"hello world".to_vec());
        assert!(matches!(
            service.page_count(&garbage),
            Err(Error::UnreadableDocument(_))
        ));
    }

    #[test]
    fn test_open_missing_path() {
        let service = PdfTransformService::without_office();
        let missing = DocumentHandle::Path("/no/such/doc.pdf".into());
        assert!(matches!(
            service.page_count(&missing),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_extract_subrange_page_count() {
        let service = PdfTransformService::without_office();
        let data = service.extract_subrange(&handle(5), 2, 4).unwrap();
        let result = DocumentHandle::from_bytes(data);
        assert_eq!(service.page_count(&result).unwrap(), 3);
    }

    #[test]
    fn test_extract_single_page_of_single_page_doc() {
        let service = PdfTransformService::without_office();
        let data = service.extract_subrange(&handle(1), 1, 1).unwrap();
        let result = DocumentHandle::from_bytes(data);
        assert_eq!(service.page_count(&result).unwrap(), 1);
    }

    #[test]
    fn test_extract_out_of_range() {
        let service = PdfTransformService::without_office();
        let result = service.extract_subrange(&handle(5), 4, 9);
        assert!(matches!(result, Err(Error::InvalidPageRange(_))));
    }

    #[test]
    fn test_concatenate_page_counts_add_up() {
        let service = PdfTransformService::without_office();
        let data = service.concatenate(&[handle(2), handle(3)]).unwrap();
        let merged = DocumentHandle::from_bytes(data);
        assert_eq!(service.page_count(&merged).unwrap(), 5);
    }

    #[test]
    fn test_merge_then_extract_front_matches_first_input() {
        // merging [A, B] then taking pages 1..pages(A) yields A's page count
        let service = PdfTransformService::without_office();
        let merged = service.concatenate(&[handle(2), handle(4)]).unwrap();
        let merged = DocumentHandle::from_bytes(merged);
        let front = service.extract_subrange(&merged, 1, 2).unwrap();
        let front = DocumentHandle::from_bytes(front);
        assert_eq!(service.page_count(&front).unwrap(), 2);
    }

    #[test]
    fn test_recompress_is_idempotent() {
        let service = PdfTransformService::without_office();
        let once = service.recompress(&handle(2)).unwrap();
        let twice = service
            .recompress(&DocumentHandle::from_bytes(once))
            .unwrap();
        let result = DocumentHandle::from_bytes(twice);
        assert_eq!(service.page_count(&result).unwrap(), 2);
    }

    #[test]
    fn test_convert_without_office_is_unsupported() {
        let service = PdfTransformService::without_office();
        let dir = tempfile::tempdir().unwrap();
        let result = service.convert_to_docx(&handle(1), &dir.path().join("out.docx"));
        assert!(matches!(result, Err(Error::ConversionUnsupported(_))));
        assert!(!service.supports_office_conversion());
    }
}
