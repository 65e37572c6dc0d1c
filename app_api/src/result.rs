use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

pub fn result() -> Value {
    serde_json::json!({"code":200})
}

pub fn result_data<T: Serialize + Debug>(data: T) -> Value {
    serde_json::json!({"code":200,"data":data})
}

pub fn result_list<T: Serialize + Debug>(list: Vec<T>) -> Value {
    serde_json::json!({"code":200,"data":list})
}
