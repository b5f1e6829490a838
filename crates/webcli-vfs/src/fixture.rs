//! Built-in sample tree loaded at startup.

use crate::node::{Entries, VNode};

fn dir<const N: usize>(entries: [(&str, VNode); N]) -> VNode {
    VNode::Directory {
        entries: entries
            .into_iter()
            .map(|(name, node)| (name.to_string(), node))
            .collect::<Entries>(),
    }
}

const CREDITS: &str = "This Web CLI Terminal was created by Rajat Malhotra\n\n\
A web-based command line interface with support for various bash commands.\n\n\
Enjoy exploring!";

const README: &str = "Welcome to Web CLI!\n\n\
This is a web-based command line interface.\n\
You can use various bash commands here.\n\n\
Type \"help\" to see available commands.";

const TODO: &str = "TODO List:\n\n\
1. Learn JavaScript\n\
2. Build web applications\n\
3. Master command line\n\
4. Deploy projects\n\
5. Write documentation";

const POEM: &str = "Roses are red,\n\
Violets are blue,\n\
Web CLI is awesome,\n\
And so are you!\n\n\
Code is poetry,\n\
Terminals are art,\n\
With every command,\n\
You play your part.";

const SCRIPT: &str = "#!/bin/bash\n\n\
echo \"Hello World\"\n\
echo \"This is a sample script\"\n\n\
for i in {1..5}; do\n    \
echo \"Count: $i\"\n\
done";

const CONFIG_JSON: &str = "{\n  \"name\": \"web-cli\",\n  \"version\": \"1.0.0\",\n  \
\"author\": \"CLI Developer\",\n  \"settings\": {\n    \"theme\": \"dark\",\n    \
\"fontSize\": 16\n  }\n}";

const NOTES: &str = "My Personal Notes\n\
=================\n\n\
JavaScript Tips:\n\
- Use const and let instead of var\n\
- Arrow functions are concise\n\
- Async/await for promises\n\n\
Bash Commands:\n\
- ls: list files\n\
- cat: view file content\n\
- grep: search in files\n\
- find: search for files";

const LOG: &str = "[2025-01-01 10:00:00] System started\n\
[2025-01-01 10:05:23] User logged in\n\
[2025-01-01 10:15:45] File uploaded\n\
[2025-01-01 10:30:12] Command executed\n\
[2025-01-01 11:00:00] System check passed\n\
[2025-01-01 12:00:00] Backup completed\n\
[2025-01-01 13:45:30] Error: Connection timeout\n\
[2025-01-01 14:00:00] System restored\n\
[2025-01-01 15:30:00] User logged out\n\
[2025-01-01 16:00:00] System shutdown";

/// The sample tree: a populated `/home/user`, `/etc` and an empty `/var`.
pub fn seed() -> VNode {
    let user = dir([
        ("CREDITS.txt", VNode::file(CREDITS)),
        (
            "documents",
            dir([
                ("readme.txt", VNode::file(README)),
                ("todo.txt", VNode::file(TODO)),
                ("poem.txt", VNode::file(POEM)),
            ]),
        ),
        (
            "projects",
            dir([
                ("web-app", VNode::empty_dir()),
                ("script.sh", VNode::file(SCRIPT)),
                ("config.json", VNode::file(CONFIG_JSON)),
            ]),
        ),
        ("notes.txt", VNode::file(NOTES)),
        ("log.txt", VNode::file(LOG)),
    ]);

    dir([
        ("home", dir([("user", user)])),
        ("etc", dir([("config.conf", VNode::file("Configuration file"))])),
        ("var", VNode::empty_dir()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_order() {
        let root = seed();
        let names: Vec<&str> = root.entries().unwrap().keys().map(String::as_str).collect();
        assert_eq!(names, ["home", "etc", "var"]);
    }

    #[test]
    fn home_order() {
        let root = seed();
        let home = &root.entries().unwrap()["home"].entries().unwrap()["user"];
        let names: Vec<&str> = home.entries().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            names,
            ["CREDITS.txt", "documents", "projects", "notes.txt", "log.txt"]
        );
    }

    #[test]
    fn script_keeps_indentation() {
        assert!(SCRIPT.contains("do\n    echo \"Count: $i\"\ndone"));
    }

    #[test]
    fn log_has_ten_lines() {
        assert_eq!(LOG.split('\n').count(), 10);
    }

    #[test]
    fn config_json_is_valid_json() {
        let v: serde_json::Value = serde_json::from_str(CONFIG_JSON).unwrap();
        assert_eq!(v["settings"]["fontSize"], 16);
    }
}
