//! Page geometry read straight from the file with lopdf

use crate::page::Dimensions;
use crate::types::*;
use lopdf::{Document, Object, ObjectId};
use std::path::Path;

/// Guards against `Parent` cycles in broken page trees
const MAX_TREE_DEPTH: usize = 32;

pub(crate) async fn measure_file(path: &Path) -> Result<Dimensions> {
    let bytes = tokio::fs::read(path).await?;
    tokio::task::spawn_blocking(move || {
        let doc = Document::load_mem(&bytes)?;
        first_page_dimensions(&doc)
    })
    .await?
}

/// Size of the first page's `CropBox`, or its `MediaBox` when there is none.
/// Both may be inherited from the page tree.
pub fn first_page_dimensions(doc: &Document) -> Result<Dimensions> {
    let page_id = *doc
        .get_pages()
        .values()
        .next()
        .ok_or(BookletError::NoPages)?;

    let rect = match inherited_box(doc, page_id, b"CropBox")? {
        Some(rect) => rect,
        None => inherited_box(doc, page_id, b"MediaBox")?.ok_or_else(|| {
            BookletError::Config("Page has neither CropBox nor MediaBox".to_string())
        })?,
    };

    Ok(Dimensions::Known {
        width: (rect[2] - rect[0]).abs(),
        height: (rect[3] - rect[1]).abs(),
    })
}

fn inherited_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<[f64; 4]>> {
    let mut current = Some(page_id);
    let mut depth = 0;

    while let Some(id) = current {
        if depth > MAX_TREE_DEPTH {
            break;
        }
        let dict = doc.get_dictionary(id)?;
        if let Ok(obj) = dict.get(key) {
            return read_rect(doc, obj).map(Some);
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    Ok(None)
}

fn read_rect(doc: &Document, obj: &Object) -> Result<[f64; 4]> {
    let array = resolve(doc, obj)?.as_array()?;
    if array.len() != 4 {
        return Err(BookletError::Config(format!(
            "Page box has {} entries instead of 4",
            array.len()
        )));
    }

    let mut rect = [0.0; 4];
    for (slot, value) in rect.iter_mut().zip(array) {
        *slot = extract_number(resolve(doc, value)?).ok_or_else(|| {
            BookletError::Config("Page box holds a non-numeric entry".to_string())
        })?;
    }
    Ok(rect)
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

fn extract_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Dictionary, Stream};

    fn document(page_extra: Vec<(&str, Object)>, pages_extra: Vec<(&str, Object)>) -> Document {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Contents", Object::Reference(content_id)),
        ]);
        for (k, v) in page_extra {
            page.set(k, v);
        }
        let page_id = doc.add_object(page);

        let mut pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
            ("Count", Object::Integer(1)),
        ]);
        for (k, v) in pages_extra {
            pages.set(k, v);
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", catalog_id);
        doc
    }

    fn rect(values: [i64; 4]) -> Object {
        Object::Array(values.iter().map(|v| Object::Integer(*v)).collect())
    }

    #[test]
    fn test_crop_box_wins() {
        let doc = document(
            vec![
                ("MediaBox", rect([0, 0, 1224, 792])),
                ("CropBox", rect([12, 10, 1212, 782])),
            ],
            vec![],
        );
        assert_eq!(
            first_page_dimensions(&doc).unwrap(),
            Dimensions::Known {
                width: 1200.0,
                height: 772.0
            }
        );
    }

    #[test]
    fn test_inherited_media_box() {
        let doc = document(vec![], vec![("MediaBox", rect([0, 0, 612, 792]))]);
        assert_eq!(
            first_page_dimensions(&doc).unwrap(),
            Dimensions::Known {
                width: 612.0,
                height: 792.0
            }
        );
    }

    #[test]
    fn test_missing_box_is_an_error() {
        let doc = document(vec![], vec![]);
        assert!(first_page_dimensions(&doc).is_err());
    }
}
