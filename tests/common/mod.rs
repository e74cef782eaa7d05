//! Shared fixtures for the integration test binaries.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tokio::net::TcpListener;

use resume_analyzer::config::DEFAULT_GEMINI_BASE_URL;
use resume_analyzer::models::ChatMessage;
use resume_analyzer::services::{ChatCompletion, FragmentStream, ResumeAnalyzer};
use resume_analyzer::{create_router, AppError, AppResult, AppState, Config};

/// Builds a PDF with one page per entry; `None` yields a page whose content
/// stream draws no text.
pub fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let operations = match page {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(Object::from(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("serialize pdf");
    buffer
}

/// ToUnicode CMap mapping every printable ASCII code point to itself.
const IDENTITY_TO_UNICODE: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0020> <007E> <0020>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end
";

/// Builds a one-page PDF that draws `text` with a Type0 font using the
/// Identity-H encoding, the way most word processors embed fonts. Glyph
/// codes are two-byte code points, mapped back by a `/ToUnicode` CMap.
pub fn pdf_with_identity_h_text(text: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => "ArialMT",
        "Flags" => 32,
        "FontBBox" => vec![(-665).into(), (-325).into(), 2000.into(), 1006.into()],
        "ItalicAngle" => 0,
        "Ascent" => 905,
        "Descent" => -212,
        "CapHeight" => 716,
        "StemV" => 80,
    });
    let descendant_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "ArialMT",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 1000,
        "CIDToGIDMap" => "Identity",
    });
    let to_unicode_id = doc.add_object(Stream::new(
        dictionary! {},
        IDENTITY_TO_UNICODE.as_bytes().to_vec(),
    ));
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "ArialMT",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::from(descendant_id)],
        "ToUnicode" => to_unicode_id,
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let codes: Vec<u8> = text
        .encode_utf16()
        .flat_map(|unit| unit.to_be_bytes())
        .collect();
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::String(codes, StringFormat::Hexadecimal)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content stream"),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::from(page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("serialize pdf");
    buffer
}

/// How a [`ScriptedChat`] answers every call.
#[derive(Clone)]
pub enum Script {
    Reply(Vec<&'static str>),
    FailToOpen(&'static str),
    FailAfter(Vec<&'static str>, &'static str),
    Hang,
}

/// Chat backend that replays a script and records what it was sent.
pub struct ScriptedChat {
    script: Script,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedChat {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

fn fragments(items: &[&'static str]) -> Vec<AppResult<String>> {
    items.iter().map(|s| Ok(s.to_string())).collect()
}

#[async_trait]
impl ChatCompletion for ScriptedChat {
    async fn stream_chat(&self, messages: Vec<ChatMessage>) -> AppResult<FragmentStream> {
        self.calls.lock().unwrap().push(messages);

        match &self.script {
            Script::Reply(items) => Ok(stream::iter(fragments(items)).boxed()),
            Script::FailToOpen(message) => Err(AppError::completion(*message)),
            Script::FailAfter(items, message) => {
                let mut chunks = fragments(items);
                chunks.push(Err(AppError::completion(*message)));
                Ok(stream::iter(chunks).boxed())
            }
            Script::Hang => Ok(stream::pending().boxed()),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 8080,
        max_file_size_mb: 1,
        request_timeout_seconds: 5,
        gemini_api_key: "test-key".to_string(),
        gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
    }
}

pub fn test_state(chat: Arc<dyn ChatCompletion>) -> AppState {
    AppState::with_chat(test_config(), chat)
}

/// State whose chat call gives up after `timeout`.
pub fn test_state_with_timeout(chat: Arc<dyn ChatCompletion>, timeout: Duration) -> AppState {
    AppState {
        config: Arc::new(test_config()),
        analyzer: Arc::new(ResumeAnalyzer::new(chat, timeout)),
    }
}

/// Serves `state` on an ephemeral local port and returns its base url.
pub async fn spawn_app(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.expect("serve test app");
    });
    format!("http://{}", addr)
}

pub const BOUNDARY: &str = "resume-analyzer-test-boundary";

/// Hand-built multipart body with a single part.
pub fn multipart_body(field: &str, file_name: Option<&str>, content: &[u8]) -> Vec<u8> {
    let disposition = match file_name {
        Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
        None => format!("form-data; name=\"{}\"", field),
    };
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: application/pdf\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}
