use crate::models::{
    is_extension_allowed, CreateImport, Import, ImportType, MAX_UPLOAD_FILES,
};
use crate::ui::app_context::use_app_context;
use crate::ui::toast_context::use_toast;
use dioxus::prelude::*;
use rfd::AsyncFileDialog;

#[derive(Clone, PartialEq)]
struct PickedFile {
    name: String,
    bytes: Vec<u8>,
}

/// Creation form: name, type, and one attached file. Validation failures
/// toast immediately without touching the network.
#[component]
pub fn NewImport(on_close: EventHandler<()>, on_created: EventHandler<Import>) -> Element {
    let app = use_app_context();
    let toasts = use_toast();
    let mut name = use_signal(String::new);
    let mut import_type = use_signal(|| ImportType::Csv);
    let mut files = use_signal(Vec::<PickedFile>::new);
    let mut creating = use_signal(|| false);

    let pick_file = move |_| {
        if files.peek().len() >= MAX_UPLOAD_FILES {
            toasts.alert(format!(
                "At most {} file(s) can be attached to an import",
                MAX_UPLOAD_FILES
            ));
            return;
        }

        let import_type = *import_type.peek();
        spawn(async move {
            let Some(handle) = AsyncFileDialog::new()
                .set_title("Choose import file")
                .add_filter(import_type.as_str(), import_type.allowed_extensions())
                .pick_file()
                .await
            else {
                return;
            };

            let file_name = handle.file_name();
            if !is_extension_allowed(&file_name, import_type) {
                toasts.alert(format!(
                    "{} imports accept: {}",
                    import_type,
                    import_type.allowed_extensions().join(", ")
                ));
                return;
            }
            if files.peek().len() >= MAX_UPLOAD_FILES {
                toasts.alert(format!(
                    "At most {} file(s) can be attached to an import",
                    MAX_UPLOAD_FILES
                ));
                return;
            }

            let bytes = handle.read().await;
            files.write().push(PickedFile {
                name: file_name,
                bytes,
            });
        });
    };

    let create = {
        let app = app.clone();
        move |_| {
            let trimmed = name.peek().trim().to_string();
            if trimmed.is_empty() {
                toasts.alert("Import name is required");
                return;
            }
            if files.peek().is_empty() {
                toasts.alert("Attach a file before creating the import");
                return;
            }
            if *creating.peek() {
                return;
            }
            creating.set(true);

            let gateway = app.gateway.clone();
            let picked = files.peek().first().cloned();
            let import_type = *import_type.peek();

            spawn(async move {
                let record = gateway
                    .create(CreateImport {
                        name: trimmed,
                        import_type,
                        status: None,
                        progress: None,
                    })
                    .await;

                if let Some(file) = picked {
                    if let Err(e) = gateway.upload_file(&record.id, &file.name, file.bytes).await {
                        toasts.alert(format!("Import created, but the file upload failed: {}", e));
                    }
                }

                toasts.info("Import created");
                creating.set(false);
                on_created.call(record);
                on_close.call(());
            });
        }
    };

    rsx! {
        div { class: "fixed inset-0 z-40 flex items-center justify-center bg-black/40",
            div { class: "w-full max-w-lg rounded-lg bg-white shadow-lg flex flex-col gap-4 p-6",
                h2 { class: "text-lg font-bold", "New import" }

                div { class: "flex flex-col gap-1",
                    label { class: "text-gray-500 text-xs", "Name" }
                    input {
                        class: "px-3 py-2 border border-gray-300 rounded-md",
                        value: "{name}",
                        oninput: move |evt| name.set(evt.value()),
                    }
                }

                div { class: "flex flex-col gap-1",
                    label { class: "text-gray-500 text-xs", "Type" }
                    select {
                        class: "px-3 py-2 border border-gray-300 rounded-md bg-white",
                        onchange: move |evt| {
                            if let Some(t) = ImportType::from_key(&evt.value()) {
                                import_type.set(t);
                            }
                        },
                        for ty in ImportType::ALL {
                            option {
                                value: ty.as_str(),
                                selected: ty == import_type(),
                                "{ty}"
                            }
                        }
                    }
                }

                div { class: "flex flex-col gap-2",
                    label { class: "text-gray-500 text-xs", "File" }
                    for (index, file) in files().into_iter().enumerate() {
                        div {
                            key: "{file.name}",
                            class: "flex items-center justify-between border border-gray-200 rounded px-3 py-2 text-sm",
                            span { "{file.name}" }
                            button {
                                class: "text-red-600 text-xs hover:underline",
                                onclick: move |_| {
                                    files.write().remove(index);
                                },
                                "Remove"
                            }
                        }
                    }
                    button {
                        class: "border border-dashed border-gray-400 text-gray-600 rounded px-3 py-2 text-sm hover:bg-gray-50",
                        onclick: pick_file,
                        "Choose file"
                    }
                }

                div { class: "flex gap-2 border-t border-gray-200 pt-4",
                    button {
                        class: "w-full bg-white border border-gray-300 hover:bg-gray-100 text-gray-800 font-medium py-2 px-4 rounded",
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        class: "w-full bg-blue-600 hover:bg-blue-700 text-white font-medium py-2 px-4 rounded disabled:opacity-50",
                        disabled: creating(),
                        onclick: create,
                        "Create"
                    }
                }
            }
        }
    }
}
