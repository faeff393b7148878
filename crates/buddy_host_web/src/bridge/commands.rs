use buddy_host::{BridgeCommand, BridgeError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Argument object for commands that take no parameters.
pub(crate) fn no_args() -> Value {
    Value::Object(Map::new())
}

fn decode<T: DeserializeOwned>(command: BridgeCommand, value: Value) -> Result<T, BridgeError> {
    serde_json::from_value(value)
        .map_err(|e| BridgeError::Decode(format!("{}: {e}", command.command_name())))
}

pub(crate) async fn invoke_decoded<T: DeserializeOwned>(
    command: BridgeCommand,
    args: Value,
) -> Result<T, BridgeError> {
    let value = super::interop::invoke(command.command_name(), args).await?;
    decode(command, value)
}

pub(crate) async fn invoke_unit(command: BridgeCommand, args: Value) -> Result<(), BridgeError> {
    super::interop::invoke(command.command_name(), args)
        .await
        .map(|_| ())
}
