use colloquy_llm::Content;
use colloquy_persist::{MessageRole, StoredMessage, Thread};
use mongodb::bson::{self, doc, oid::ObjectId, Bson};

#[test]
fn test_thread_document_uses_bson_dates() {
    let thread = Thread::new("wire check");
    let document = bson::to_document(&thread).unwrap();

    assert!(matches!(document.get("updated_at"), Some(Bson::DateTime(_))));
    assert!(matches!(document.get("created_at"), Some(Bson::DateTime(_))));
    assert!(matches!(document.get("_id"), Some(Bson::ObjectId(_))));
}

#[test]
fn test_thread_document_roundtrip() {
    let mut thread = Thread::new("roundtrip");
    thread.messages.push(StoredMessage::user("question"));
    thread.messages.push(StoredMessage::assistant("answer"));

    let document = bson::to_document(&thread).unwrap();
    let back: Thread = bson::from_document(document).unwrap();

    assert_eq!(back.id, thread.id);
    assert_eq!(back.messages.len(), 2);
    assert_eq!(back.messages[0].role, MessageRole::User);
    assert_eq!(back.messages[1].role, MessageRole::Assistant);
    assert_eq!(back.messages[0].content.as_text(), Some("question"));
}

#[test]
fn test_legacy_null_content_deserializes_as_empty_text() {
    let document = doc! {
        "_id": ObjectId::new(),
        "role": "user",
        "content": Bson::Null,
        "timestamp": bson::DateTime::now(),
    };

    let message: StoredMessage = bson::from_document(document).unwrap();
    assert_eq!(message.content, Content::Text(String::new()));
}

#[test]
fn test_legacy_part_list_content_deserializes() {
    let document = doc! {
        "_id": ObjectId::new(),
        "role": "assistant",
        "content": [{ "type": "text", "text": "from parts" }],
        "timestamp": bson::DateTime::now(),
    };

    let message: StoredMessage = bson::from_document(document).unwrap();
    assert_eq!(message.content.as_text(), Some("from parts"));
}
