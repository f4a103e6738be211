// @generated by easyjs-embed-std. Do not edit by hand.
// EasyJS standard library version v0.4.5.

/// Standard library version these modules were generated from.
pub const STD_VERSION: &str = "v0.4.5";

/// Names of every embedded standard library module, sorted.
pub const STD_MODULES: &[&str] = &[
    "dom",
    "easy_wasm",
    "http",
    "io",
    "json",
    "wasm",
];

const DOM_SRC: &str = "// ! This can only be used in the browser.

// shorthand for document.
dom := {
    create_element: fn (name) {
        return document.createElement(name)
    }

    select_all: fn (query) {
        return document.querySelectorAll(query)
    }

    add_to_body: fn (node) {
        document.body.appendChild(node)
    }

    remove_from_body: fn (node) {
        document.body.removeChild(node)
    }
}
";
const EASY_WASM_SRC: &str = "// Used for working with EasyJS's WASM worker.

import \"wasm\"

struct EasyWasm {
    static async fn load_from_file(file_path) {
        bytes := await fetch(file_path)
        return await EasyWasm.load_from_bytes(await bytes.arrayBuffer())
    }
}
";
const HTTP_SRC: &str = "// Make requests using the Fetch api.
async fn get(url, headers) {
    return fetch(url, { method: \"GET\", headers: headers })
}

async fn post(url, headers, body) {
    return fetch(url, { method: \"POST\", headers: headers, body: body })
}
";
const IO_SRC: &str = "fn print(x) {
    console.log(x)
}
";
const JSON_SRC: &str = "to_json := fn(str) { return JSON.parse(str); }

from_json := fn(value) { return JSON.stringify(value); }
";
const WASM_SRC: &str = "// Helpers for loading WebAssembly modules.

async fn instantiate(bytes, imports) {
    return await WebAssembly.instantiate(bytes, imports)
}
";

/// Load a standard library module from EasyJS version v0.4.5, or an empty string if not found.
#[must_use]
pub fn load_std(name: &str) -> &'static str {
    match name {
        "dom" => DOM_SRC,
        "easy_wasm" => EASY_WASM_SRC,
        "http" => HTTP_SRC,
        "io" => IO_SRC,
        "json" => JSON_SRC,
        "wasm" => WASM_SRC,
        _ => "",
    }
}
