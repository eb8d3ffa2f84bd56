use llmnode_core::config::resolve_env;
use llmnode_core::inputs::NodeData;
use serde_json::json;

#[test]
fn test_node_data_from_json() {
    let json = r#"{
        "id": "chatTogetherAI_0",
        "inputs": {
            "modelName": "mistralai/Mixtral-8x7B-Instruct-v0.1",
            "temperature": "0.2",
            "maxTokens": 100
        },
        "credential": "cred-123"
    }"#;

    let data = NodeData::from_json(json).unwrap();
    assert_eq!(data.id, "chatTogetherAI_0");
    assert_eq!(data.credential.as_deref(), Some("cred-123"));
    assert_eq!(data.input_str("temperature").as_deref(), Some("0.2"));
    assert_eq!(data.input_str("maxTokens").as_deref(), Some("100"));
}

#[test]
fn test_node_data_defaults() {
    let data = NodeData::from_json("{}").unwrap();
    assert!(data.inputs.is_empty());
    assert!(data.credential.is_none());
}

#[test]
fn test_node_data_invalid_json() {
    let err = NodeData::from_json("{ nope").unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_node_data_to_json_skips_missing_credential() {
    let out = NodeData::new("n").with_input("topP", "0.5").to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["inputs"], json!({"topP": "0.5"}));
    assert!(value.get("credential").is_none());
}

#[test]
fn test_env_resolution() {
    // SAFETY: test-only, variable name unique to this test
    unsafe { std::env::set_var("LLMNODE_TEST_MODEL", "teknium/OpenHermes-2p5-Mistral-7B") };

    assert_eq!(resolve_env("${LLMNODE_TEST_MODEL}"), "teknium/OpenHermes-2p5-Mistral-7B");
    assert_eq!(resolve_env("plain-value"), "plain-value");

    let data = NodeData::new("n")
        .with_input("modelName", "${LLMNODE_TEST_MODEL}")
        .resolve_env_refs();
    assert_eq!(
        data.input_str("modelName").as_deref(),
        Some("teknium/OpenHermes-2p5-Mistral-7B")
    );

    unsafe { std::env::remove_var("LLMNODE_TEST_MODEL") };
}
