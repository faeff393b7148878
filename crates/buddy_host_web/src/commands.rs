//! Tauri command bridge adapter.
//!
//! Each [`CommandBridge`] method invokes the backend command named by
//! [`BridgeCommand::command_name`] with the argument keys the backend handlers declare.

use buddy_host::{
    AppSettings, BridgeCommand, BridgeError, BridgeFuture, ClipboardEntry, CommandBridge,
    ImageItem, ItemKind, MemoryStats, SessionRecord, TextItem,
};
use serde_json::json;

use crate::bridge::{invoke_decoded, invoke_unit, no_args};

#[derive(Debug, Clone, Copy, Default)]
/// Command bridge backed by the Tauri `invoke` IPC.
pub struct TauriCommandBridge;

impl CommandBridge for TauriCommandBridge {
    fn list_images<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<ImageItem>, BridgeError>> {
        Box::pin(invoke_decoded(BridgeCommand::ListImages, no_args()))
    }

    fn list_text_items<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<TextItem>, BridgeError>> {
        Box::pin(invoke_decoded(BridgeCommand::ListTextItems, no_args()))
    }

    fn list_clipboard_history<'a>(
        &'a self,
    ) -> BridgeFuture<'a, Result<Vec<ClipboardEntry>, BridgeError>> {
        Box::pin(invoke_decoded(BridgeCommand::ListClipboardHistory, no_args()))
    }

    fn delete_image<'a>(&'a self, filename: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(invoke_unit(
            BridgeCommand::DeleteImage,
            json!({ "filename": filename }),
        ))
    }

    fn delete_text_item<'a>(&'a self, id: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(invoke_unit(BridgeCommand::DeleteTextItem, json!({ "id": id })))
    }

    fn clear_text_history<'a>(&'a self) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(invoke_unit(BridgeCommand::ClearTextHistory, no_args()))
    }

    fn copy_path<'a>(&'a self, path: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(invoke_unit(BridgeCommand::CopyPath, json!({ "path": path })))
    }

    fn copy_image<'a>(&'a self, filename: &'a str) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(invoke_unit(
            BridgeCommand::CopyImage,
            json!({ "filename": filename }),
        ))
    }

    fn paste_from_history<'a>(
        &'a self,
        content: &'a str,
        kind: ItemKind,
    ) -> BridgeFuture<'a, Result<(), BridgeError>> {
        Box::pin(invoke_unit(
            BridgeCommand::PasteFromHistory,
            json!({ "content": content, "entryType": kind.as_str() }),
        ))
    }

    fn get_monitor_status<'a>(&'a self) -> BridgeFuture<'a, Result<bool, BridgeError>> {
        Box::pin(invoke_decoded(BridgeCommand::GetMonitorStatus, no_args()))
    }

    fn toggle_monitor<'a>(&'a self) -> BridgeFuture<'a, Result<bool, BridgeError>> {
        Box::pin(invoke_decoded(BridgeCommand::ToggleMonitor, no_args()))
    }

    fn get_settings<'a>(&'a self) -> BridgeFuture<'a, Result<AppSettings, BridgeError>> {
        Box::pin(invoke_decoded(BridgeCommand::GetSettings, no_args()))
    }

    fn update_settings<'a>(
        &'a self,
        settings: &'a AppSettings,
    ) -> BridgeFuture<'a, Result<AppSettings, BridgeError>> {
        // The backend acknowledges with unit and stores the record as sent.
        Box::pin(async move {
            invoke_unit(
                BridgeCommand::UpdateSettings,
                json!({ "newSettings": settings }),
            )
            .await?;
            Ok(settings.clone())
        })
    }

    fn memory_stats<'a>(&'a self) -> BridgeFuture<'a, Result<MemoryStats, BridgeError>> {
        Box::pin(invoke_decoded(BridgeCommand::MemoryStats, no_args()))
    }

    fn session_list<'a>(&'a self) -> BridgeFuture<'a, Result<Vec<SessionRecord>, BridgeError>> {
        Box::pin(invoke_decoded(BridgeCommand::SessionList, no_args()))
    }
    fn restart_vm<'a>(&'a self) -> BridgeFuture<'a, Result<String, BridgeError>> {
        Box::pin(invoke_decoded(BridgeCommand::RestartVm, no_args()))
    }
}
