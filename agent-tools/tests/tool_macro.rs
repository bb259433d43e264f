use std::sync::Arc;

use agent_tools::{
    CallOutcome, Dispatcher, DuplicatePolicy, RegistryBuilder, ToolCall, ToolRegistry, TypeTag,
    tool,
};
use serde_json::{Value, json};

/// 测试用例，这个函数的功能是将传入的两个参数相加并返回
/// :param a: 第一个参数
/// :param b: 第二个参数
/// :return: 两个参数相加得到的和
#[tool]
fn case_func(a: Value, b: Value) -> Value {
    json!(a.as_i64().unwrap_or_default() + b.as_i64().unwrap_or_default())
}

const CASE_FUNC_JSON: &str = r#"{
    "type": "function",
    "function": {
        "name": "case_func",
        "description": "测试用例，这个函数的功能是将传入的两个参数相加并返回",
        "parameters": {
            "type": "object",
            "properties": {
                "a": {
                    "type": "string",
                    "description": "第一个参数"
                },
                "b": {
                    "type": "string",
                    "description": "第二个参数"
                }
            },
            "required": [
                "a",
                "b"
            ]
        }
    }
}"#;

/// Adds two numbers.
/// :param a: first
/// :param b: second
/// :return: the sum
#[tool]
fn add(a: i64, b: i64) -> i64 {
    a + b
}

/// Divides `a` by `b`.
/// :param a: dividend
/// :param b: divisor
#[tool]
fn divide(a: f64, b: f64) -> Result<f64, String> {
    if b == 0.0 {
        return Err("division by zero".to_owned());
    }
    Ok(a / b)
}

/// Greets someone.
///
/// Falls back to "Hello" when no greeting is given.
/// :param name: who to greet
/// :param greeting: optional salutation
#[tool]
async fn greet(name: &str, greeting: Option<String>) -> String {
    format!("{}, {name}!", greeting.as_deref().unwrap_or("Hello"))
}

/// Repeats text.
/// :param text: the text
/// :param times: how many copies
#[tool]
fn repeat(text: String, #[default] times: usize) -> Vec<String> {
    vec![text; times]
}

/// Current weather for a city.
/// :param city: city name
/// :param units: unit system
#[tool(name = "lookup_weather")]
fn weather(city: String, units: Option<String>) -> Value {
    json!({ "city": city, "units": units.unwrap_or_else(|| "metric".to_owned()), "temp": 21 })
}

/// Sums a list.
#[tool]
fn total(values: &[i64]) -> i64 {
    values.iter().sum()
}

fn dispatcher() -> Dispatcher {
    let mut builder = RegistryBuilder::new().with_duplicate_policy(DuplicatePolicy::Reject);
    for binding in [
        case_func_tool(),
        add_tool(),
        divide_tool(),
        greet_tool(),
        repeat_tool(),
        weather_tool(),
        total_tool(),
    ] {
        builder.register_binding(binding).expect("unique tool names");
    }
    Dispatcher::new(Arc::new(builder.build()))
}

#[test]
fn annotated_function_stays_callable() {
    assert_eq!(case_func(json!(1), json!(2)), json!(3));
    assert_eq!(add(1, 2), 3);
}

#[test]
fn untyped_parameters_render_reference_json() {
    assert_eq!(case_func_tool().descriptor().to_tool_json(), CASE_FUNC_JSON);
}

#[test]
fn descriptor_reflects_signature() {
    let binding = add_tool();
    let descriptor = binding.descriptor();

    assert_eq!(descriptor.name(), "add");
    assert_eq!(descriptor.description(), "Adds two numbers.");
    assert_eq!(descriptor.returns(), Some("the sum"));
    assert_eq!(descriptor.required(), &["a".to_owned(), "b".to_owned()]);
    assert_eq!(descriptor.parameter("a").unwrap().type_tag(), TypeTag::Integer);
    assert_eq!(descriptor.parameter("b").unwrap().description(), "second");
}

#[test]
fn optional_parameters_are_not_required() {
    let greet = greet_tool();
    assert_eq!(greet.descriptor().required(), &["name".to_owned()]);
    assert_eq!(
        greet.descriptor().description(),
        "Greets someone.\n\nFalls back to \"Hello\" when no greeting is given."
    );
    assert_eq!(
        greet.descriptor().parameter("greeting").unwrap().type_tag(),
        TypeTag::String
    );

    let repeat = repeat_tool();
    assert_eq!(repeat.descriptor().required(), &["text".to_owned()]);
    assert_eq!(
        repeat.descriptor().parameter("times").unwrap().type_tag(),
        TypeTag::Integer
    );
}

#[test]
fn name_override_and_collection_types() {
    let weather = weather_tool();
    assert_eq!(weather.descriptor().name(), "lookup_weather");

    let total = total_tool();
    assert_eq!(
        total.descriptor().parameter("values").unwrap().type_tag(),
        TypeTag::Array
    );
    assert_eq!(total.descriptor().description(), "Sums a list.");
    assert_eq!(total.descriptor().undocumented_parameters(), vec!["values"]);
}

#[tokio::test]
async fn dispatches_sync_tool() {
    let outcome = dispatcher()
        .invoke(&ToolCall::new("add", r#"{"a": 1, "b": 2}"#))
        .await;
    assert_eq!(outcome, CallOutcome::Success(json!(3)));
}

#[tokio::test]
async fn dispatches_async_tool_with_borrowed_and_optional_arguments() {
    let dispatcher = dispatcher();

    let default = dispatcher
        .invoke(&ToolCall::new("greet", r#"{"name": "Ada"}"#))
        .await;
    assert_eq!(default, CallOutcome::Success(json!("Hello, Ada!")));

    let custom = dispatcher
        .invoke(&ToolCall::new("greet", r#"{"name": "Ada", "greeting": "Hi"}"#))
        .await;
    assert_eq!(custom.to_message_content(), "Hi, Ada!");
}

#[tokio::test]
async fn default_attribute_fills_missing_arguments() {
    let dispatcher = dispatcher();

    let omitted = dispatcher
        .invoke(&ToolCall::new("repeat", r#"{"text": "x"}"#))
        .await;
    assert_eq!(omitted, CallOutcome::Success(json!([])));

    let given = dispatcher
        .invoke(&ToolCall::new("repeat", r#"{"text": "x", "times": 2}"#))
        .await;
    assert_eq!(given, CallOutcome::Success(json!(["x", "x"])));
}

#[tokio::test]
async fn slices_bind_from_arrays() {
    let outcome = dispatcher()
        .invoke(&ToolCall::new("total", r#"{"values": [1, 2, 3]}"#))
        .await;
    assert_eq!(outcome, CallOutcome::Success(json!(6)));
}

#[tokio::test]
async fn renamed_tool_dispatches_by_advertised_name() {
    let dispatcher = dispatcher();

    let outcome = dispatcher
        .invoke(&ToolCall::new("lookup_weather", r#"{"city": "Oslo"}"#))
        .await;
    assert_eq!(outcome.value().unwrap()["units"], json!("metric"));

    let by_fn_name = dispatcher
        .invoke(&ToolCall::new("weather", r#"{"city": "Oslo"}"#))
        .await;
    assert_eq!(
        by_fn_name.failure(),
        Some("function weather does not exist")
    );
}

#[tokio::test]
async fn tool_errors_reference_the_tool() {
    let dispatcher = dispatcher();

    let zero = dispatcher
        .invoke(&ToolCall::new("divide", r#"{"a": 1, "b": 0}"#))
        .await;
    assert_eq!(
        zero.failure(),
        Some("error in call to divide: tool execution failed: division by zero")
    );

    let ok = dispatcher
        .invoke(&ToolCall::new("divide", r#"{"a": 9, "b": 2}"#))
        .await;
    assert_eq!(ok, CallOutcome::Success(json!(4.5)));
}

#[tokio::test]
async fn invalid_arguments_are_reported() {
    let dispatcher = dispatcher();

    let extra = dispatcher
        .invoke(&ToolCall::new("add", r#"{"a": 1, "b": 2, "c": 3}"#))
        .await;
    assert_eq!(
        extra.failure(),
        Some("error in call to add: unexpected argument `c`")
    );

    let missing = dispatcher
        .invoke(&ToolCall::new("greet", r#"{"greeting": "Hi"}"#))
        .await;
    assert_eq!(
        missing.failure(),
        Some("error in call to greet: missing required argument `name`")
    );

    let malformed = dispatcher.invoke(&ToolCall::new("add", "[1, 2]")).await;
    assert_eq!(
        malformed.failure(),
        Some("argument payload is not a valid object")
    );
}

#[test]
fn collected_tools_are_registered_in_name_order() {
    let mut builder = ToolRegistry::builder();
    builder.register_collected().expect("collect annotated tools");
    let registry = builder.build();

    assert_eq!(
        registry.names(),
        &[
            "add",
            "case_func",
            "divide",
            "greet",
            "lookup_weather",
            "repeat",
            "total",
        ]
    );
}

#[test]
fn advertisement_is_stable() {
    let first = serde_json::to_string(&dispatcher().advertisement()).unwrap();
    let second = serde_json::to_string(&dispatcher().advertisement()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn advertisement_keeps_signature_order() {
    let advertisement = dispatcher().advertisement();
    let greet = advertisement
        .as_array()
        .unwrap()
        .iter()
        .find(|tool| tool["function"]["name"] == "greet")
        .expect("greet is advertised");

    let keys = |value: &Value| -> Vec<String> { value.as_object().unwrap().keys().cloned().collect() };

    assert_eq!(keys(greet), ["type", "function"]);
    assert_eq!(keys(&greet["function"]), ["name", "description", "parameters"]);
    assert_eq!(
        keys(&greet["function"]["parameters"]),
        ["type", "properties", "required"]
    );
    assert_eq!(
        keys(&greet["function"]["parameters"]["properties"]),
        ["name", "greeting"]
    );
    assert_eq!(greet["function"]["parameters"]["required"], json!(["name"]));
}
