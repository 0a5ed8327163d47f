//! HTML for the single detection page.

use base64::Engine;

use crate::inference::Diagnosis;
use crate::utils::escape_html;

/// Width the uploaded image preview is shown at
pub const PREVIEW_WIDTH: u32 = 256;

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #1f2d1f; }
h1 { color: #2e7d32; }
form { margin: 1.5rem 0; }
.warning { font-size: 1.2em; padding: 0.75rem; background: #fff8e1; border-left: 4px solid #f9a825; }
.error { font-size: 1.1em; padding: 0.75rem; background: #ffebee; border-left: 4px solid #c62828; }
.result img { border-radius: 4px; }
"#;

/// Full page: title, upload form, then whatever `section` holds
pub fn page(section: Option<&str>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Crop Disease Detection</title>
<style>{style}</style>
</head>
<body>
<h1>&#x1F331; Crop Disease Detection</h1>
<p>Upload an image of the crop leaf for disease prediction.</p>
<hr>
<form action="/detect" method="post" enctype="multipart/form-data">
<label for="image">Choose an image...</label>
<input type="file" id="image" name="image" accept=".jpg,.jpeg,.png,image/jpeg,image/png">
<button type="submit">Detect Disease</button>
</form>
{section}
</body>
</html>
"#,
        style = STYLE,
        section = section.unwrap_or_default()
    )
}

/// Warning block, e.g. when no image was uploaded
pub fn warning(message: &str) -> String {
    format!(
        "<div class=\"warning\">&#x26A0;&#xFE0F; {}</div>",
        escape_html(message)
    )
}

/// Error block for rejected uploads and failed detections
pub fn error(message: &str) -> String {
    format!("<div class=\"error\">{}</div>", escape_html(message))
}

/// `data:` URI embedding the uploaded bytes
pub fn preview_data_uri(bytes: &[u8], mime_type: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime_type, encoded)
}

/// Preview, dimensions, diagnosis and treatment
pub fn diagnosis(diagnosis: &Diagnosis, upload: Option<&[u8]>) -> String {
    let preview = upload
        .map(|bytes| {
            format!(
                "<img src=\"{}\" width=\"{}\" alt=\"Uploaded leaf\">\n",
                preview_data_uri(bytes, &diagnosis.image.mime_type),
                PREVIEW_WIDTH
            )
        })
        .unwrap_or_default();

    format!(
        "<hr>\n<div class=\"result\">\n{preview}<p>Image Shape: {width} x {height} pixels</p>\n\
         <h3>Result: {headline}</h3>\n<p><strong>Treatment:</strong> {advisory}</p>\n</div>",
        preview = preview,
        width = diagnosis.image.width,
        height = diagnosis.image.height,
        headline = escape_html(&diagnosis.prediction.headline),
        advisory = escape_html(&diagnosis.prediction.advisory),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DiseaseCatalog;
    use crate::inference::{ImageInfo, PredictionResult};

    fn sample(index: usize) -> Diagnosis {
        let catalog = DiseaseCatalog::builtin();
        Diagnosis {
            image: ImageInfo {
                width: 640,
                height: 427,
                mime_type: "image/png".to_string(),
                size_bytes: 3,
            },
            prediction: PredictionResult::from_entry(index, catalog.get(index).unwrap()),
            inference_time_ms: 1.5,
        }
    }

    #[test]
    fn test_page_has_upload_form() {
        let html = page(None);
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("name=\"image\""));
        assert!(html.contains("Detect Disease"));
    }

    #[test]
    fn test_diagnosis_block() {
        let html = diagnosis(&sample(0), Some(&[1u8, 2, 3][..]));
        assert!(html.contains("Image Shape: 640 x 427 pixels"));
        assert!(html.contains("Result: Apple leaf infected with Apple_scab"));
        assert!(html.contains("<strong>Treatment:</strong> Apple scab is a fungal disease"));
        assert!(html.contains("src=\"data:image/png;base64,AQID\""));
        assert!(html.contains("width=\"256\""));
    }

    #[test]
    fn test_healthy_diagnosis_block() {
        let html = diagnosis(&sample(1), None);
        assert!(html.contains("Result: Blueberry leaf is healthy"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_messages_are_escaped() {
        assert!(warning("<script>").contains("&lt;script&gt;"));
        assert!(error("a & b").contains("a &amp; b"));
    }
}
