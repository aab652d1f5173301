use keychain_tree::{KeyChainTree, Result};

fn main() -> Result<()> {
    let mut settings: KeyChainTree<String, String> = KeyChainTree::new();

    settings.add(["source".into(), "path".into()], "/var/data".into())?;
    settings.add(["source".into(), "format".into()], "csv".into())?;
    settings.add_one("verbose".into(), "true".into());

    assert_eq!(settings.try_get(["source", "path"])?.map(String::as_str), Some("/var/data"));
    assert_eq!(settings.try_get(["source"])?, None);
    assert_eq!(settings.try_get_one("verbose").map(String::as_str), Some("true"));

    for keys in [["source", "path"], ["source", "format"], ["source", "missing"]] {
        match settings.try_get(keys)? {
            Some(value) => println!("{} => {value}", keys.join(".")),
            None => println!("{} is not set", keys.join(".")),
        }
    }

    settings.remove(["source"])?;
    println!("{} value(s) left after removing `source`", settings.len());

    Ok(())
}
