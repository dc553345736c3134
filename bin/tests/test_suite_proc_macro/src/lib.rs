use quote::{format_ident, quote};

/// Generates one `#[test]` per `.lox` file below `bin/tests`, each calling
/// `lox_expect(<path relative to bin/tests>, <file contents>)`.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = format!("{}/..", env!("CARGO_MANIFEST_DIR"));
    let tests = walkdir::WalkDir::new(root_dir.clone())
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("lox".as_ref()))
        .map(|entry| {
            let test_file_path = entry.path().to_string_lossy().to_string();
            let relative_test_path =
                entry.path().strip_prefix(&root_dir).unwrap().to_string_lossy().replace('\\', "/");
            let test_ident = format_ident!(
                "test_{}",
                relative_test_path.trim_end_matches(".lox").replace(['/', '-', '.'], "_")
            );
            quote! {
                #[test]
                fn #test_ident() {
                    lox_expect(#relative_test_path, std::fs::read_to_string(#test_file_path).unwrap().as_str());
                }
            }
        });

    quote! {
        #[ctor::ctor]
        fn init() {
            env_logger::init();
        }

        #(#tests)*
    }
    .into()
}
