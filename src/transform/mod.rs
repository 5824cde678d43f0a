//! Page composition primitives.
//!
//! Both geometry phases (letter normalization and stamping) rebuild a
//! document page by page: the original page is wrapped as a Form XObject and
//! drawn scaled and centered onto a fresh canvas, optionally with a label in
//! the footer band. Working within one document keeps every resource
//! reference valid without cross-document object copying.

pub mod reformat;
pub mod stamp;

pub use reformat::LetterReformatter;
pub use stamp::{BatesStamper, StampOutcome};

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::error::{BatesError, Result};

/// Where and how large the original page lands on the new canvas.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    /// New page width in points.
    pub canvas_width: f64,
    /// New page height in points.
    pub canvas_height: f64,
    /// Uniform scale applied to the original content.
    pub scale: f64,
    /// Horizontal offset of the scaled content.
    pub tx: f64,
    /// Vertical offset of the scaled content.
    pub ty: f64,
}

/// A text label drawn after the page content.
#[derive(Debug, Clone)]
pub struct StampText {
    /// Label text.
    pub text: String,
    /// Left edge of the text baseline.
    pub x: f64,
    /// Baseline height from the bottom edge.
    pub y: f64,
    /// Font size in points.
    pub size: f64,
}

/// Rebuild every page of `doc` in place.
///
/// `layout` receives the page index and the original page's width/height and
/// decides the placement plus an optional stamp. Pages are processed in page
/// order; the page tree is swapped to the rebuilt pages at the end.
pub fn rebuild_pages<F>(doc: &mut Document, mut layout: F) -> Result<()>
where
    F: FnMut(usize, f64, f64) -> (Placement, Option<StampText>),
{
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

    let pages_root_id = doc
        .catalog()
        .map_err(|e| BatesError::other(format!("failed to read catalog: {e}")))?
        .get(b"Pages")
        .and_then(|p| p.as_reference())
        .map_err(|e| BatesError::other(format!("failed to read page tree root: {e}")))?;

    // One shared Times-Bold, referenced only by stamped pages.
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Bold",
    });

    let mut new_page_ids: Vec<ObjectId> = Vec::with_capacity(page_ids.len());

    for (index, &page_id) in page_ids.iter().enumerate() {
        let (x0, y0, width, height) = page_box(doc, page_id)?;
        let content = doc
            .get_page_content(page_id)
            .map_err(|e| BatesError::other(format!("failed to read page content: {e}")))?;
        let resources =
            resolve_inherited(doc, page_id, b"Resources").unwrap_or_else(|| Dictionary::new().into());

        let (placement, stamp) = layout(index, width, height);

        let form_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => vec![
                Object::Real(x0 as f32),
                Object::Real(y0 as f32),
                Object::Real((x0 + width) as f32),
                Object::Real((y0 + height) as f32),
            ],
            "Resources" => resources,
        };
        let form_id = doc.add_object(Object::Stream(Stream::new(form_dict, content)));

        // The box origin may be non-zero; fold it into the translation so
        // the visible area (not the coordinate origin) is what gets centered.
        let tx = placement.tx - placement.scale * x0;
        let ty = placement.ty - placement.scale * y0;

        let mut ops = format!(
            "q\n{s} 0 0 {s} {tx} {ty} cm\n/P0 Do\nQ\n",
            s = fmt_num(placement.scale),
            tx = fmt_num(tx),
            ty = fmt_num(ty),
        );

        let mut page_resources = dictionary! {
            "XObject" => dictionary! { "P0" => form_id },
        };

        if let Some(text) = stamp {
            page_resources.set("Font", dictionary! { "Fb" => font_id });
            ops.push_str(&format!(
                "BT\n/Fb {size} Tf\n{x} {y} Td\n({label}) Tj\nET\n",
                size = fmt_num(text.size),
                x = fmt_num(text.x),
                y = fmt_num(text.y),
                label = escape_pdf_text(&text.text),
            ));
        }

        let content_id = doc.add_object(Object::Stream(Stream::new(
            Dictionary::new(),
            ops.into_bytes(),
        )));

        let new_page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_root_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(placement.canvas_width as f32),
                Object::Real(placement.canvas_height as f32),
            ],
            "Resources" => page_resources,
            "Contents" => content_id,
        });
        new_page_ids.push(new_page_id);
    }

    let count = new_page_ids.len() as i64;
    let pages_obj = doc
        .get_object_mut(pages_root_id)
        .map_err(|e| BatesError::other(format!("failed to access page tree: {e}")))?;
    match pages_obj {
        Object::Dictionary(dict) => {
            let kids: Vec<Object> = new_page_ids
                .into_iter()
                .map(Object::Reference)
                .collect();
            dict.set("Kids", Object::Array(kids));
            dict.set("Count", Object::Integer(count));
        }
        _ => {
            return Err(BatesError::other("page tree root is not a dictionary"));
        }
    }

    // Old page objects stay orphaned in the object map; only the new Kids
    // are reachable from the catalog. Renumber for consistency.
    doc.renumber_objects();

    Ok(())
}

/// The page's effective box: origin plus width/height, with page-tree
/// inheritance resolved.
pub fn page_box(doc: &Document, page_id: ObjectId) -> Result<(f64, f64, f64, f64)> {
    let media_box = resolve_inherited(doc, page_id, b"MediaBox")
        .ok_or_else(|| BatesError::other("page has no MediaBox"))?;

    let values = match media_box {
        Object::Array(arr) if arr.len() >= 4 => arr,
        _ => return Err(BatesError::other("MediaBox is not a 4-element array")),
    };

    let mut nums = [0f64; 4];
    for (slot, value) in nums.iter_mut().zip(values.iter()) {
        *slot = value
            .as_float()
            .map_err(|e| BatesError::other(format!("bad MediaBox entry: {e}")))?
            as f64;
    }

    let (x0, y0, x1, y1) = (nums[0], nums[1], nums[2], nums[3]);
    Ok((x0, y0, x1 - x0, y1 - y0))
}

/// Look up `key` on the page dictionary, walking up the Parent chain for
/// inheritable attributes. One level of indirection is resolved.
fn resolve_inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = page_id;
    for _ in 0..64 {
        let dict = doc.get_object(current).ok()?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).ok().cloned(),
                other => Some(other.clone()),
            };
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => return None,
        }
    }
    None
}

/// Format a coordinate for a content stream: integers stay bare, fractions
/// keep at most four decimals.
fn fmt_num(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        let mut s = format!("{value:.4}");
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
        s
    }
}

/// Escape a string for a PDF literal string operand.
fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            _ => out.push(c),
        }
    }
    out
}

/// Advance widths for Times-Bold, printable ASCII 32..=126, in 1/1000 em.
const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 333, 333, 333, 500, 570, 250, 333, 250, 278, // ' '..'/'
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // '0'..'9'
    333, 333, 570, 570, 570, 500, 930, // ':'..'@'
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778, 611, // 'A'..'P'
    778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, // 'Q'..'Z'
    333, 278, 333, 581, 500, 333, // '['..'`'
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500, 556, // 'a'..'p'
    556, 444, 389, 333, 556, 500, 722, 500, 500, 444, // 'q'..'z'
    394, 220, 394, 520, // '{'..'~'
];

/// Width of `text` rendered in Times-Bold at `size` points.
pub fn text_width(text: &str, size: f64) -> f64 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                TIMES_BOLD_WIDTHS[(code - 32) as usize] as u32
            } else {
                500
            }
        })
        .sum();
    units as f64 / 1000.0 * size
}
