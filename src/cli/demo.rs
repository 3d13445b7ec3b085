//! The demo grammar served by the CLI and REPL.
//!
//! Small enough to read in one sitting, but it exercises every engine
//! feature: executable literals, bounded numeric arguments, the three string
//! forms, requirements, a custom suggestion provider, a root redirect, and a
//! fork with a context modifier.

use crate::builder::{argument, literal};
use crate::args::{boolean, greedy, integer, integer_in, phrase, word};
use crate::dispatcher::Dispatcher;
use crate::errors::EdictError;

/// The host context for demo commands: who is typing, and with what rights.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
    pub admin: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: "guest".to_string(),
            admin: false,
        }
    }
}

/// Builds the dispatcher behind `edict run`, `edict suggest`, `edict usage`,
/// and the REPL.
pub fn build_demo_dispatcher() -> Dispatcher<Session> {
    let mut dispatcher = Dispatcher::new();

    dispatcher.register(
        literal("add").then(argument("a", integer()).then(
            argument("b", integer()).executes(|ctx| {
                println!("{}", ctx.int32("a") + ctx.int32("b"));
                Ok(())
            }),
        )),
    );

    dispatcher.register(literal("say").then(argument("message", greedy()).executes(|ctx: &crate::context::CommandContext<Session>| {
        println!("{} says: {}", ctx.source().user, ctx.string("message"));
        Ok(())
    })));

    dispatcher.register(literal("echo").then(argument("text", phrase()).executes(|ctx| {
        println!("{}", ctx.string("text"));
        Ok(())
    })));

    dispatcher.register(
        literal("volume")
            .executes(|_| {
                println!("volume is 5");
                Ok(())
            })
            .then(argument("level", integer_in(0, 10)).executes(|ctx| {
                println!("volume set to {}", ctx.int32("level"));
                Ok(())
            })),
    );

    dispatcher.register(literal("debug").then(argument("enabled", boolean()).executes(
        |ctx| {
            println!(
                "debug {}",
                if ctx.boolean("enabled") { "on" } else { "off" }
            );
            Ok(())
        },
    )));

    dispatcher.register(
        literal("shutdown")
            .requires(|session: &Session| session.admin)
            .executes(|ctx| {
                if ctx.source().user == "mallory" {
                    return Err(EdictError::failure("mallory may not shut anything down"));
                }
                println!("shutting down");
                Ok(())
            }),
    );

    let root = dispatcher.root();
    dispatcher.register(literal("again").redirect(root));

    dispatcher.register(
        literal("as").then(
            argument("who", word())
                .suggests(|_ctx: &crate::context::CommandContext<Session>, builder| {
                    for user in ["alice", "bob", "mallory"] {
                        if user.starts_with(builder.remaining_lowercase()) {
                            builder.suggest(user);
                        }
                    }
                })
                .fork(root, |ctx| {
                    Ok(Session {
                        user: ctx.string("who"),
                        admin: ctx.source().admin,
                    })
                }),
        ),
    );

    dispatcher
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_grammar_executes() {
        let d = build_demo_dispatcher();
        let session = Session::default();
        assert!(d.parse_execute(session.clone(), "add 1 2").is_ok());
        assert!(d.parse_execute(session.clone(), "say hello there").is_ok());
        assert!(d.parse_execute(session.clone(), "again volume 3").is_ok());
        assert!(d.parse_execute(session.clone(), "as alice say hi").is_ok());
        assert!(d.parse_execute(session, "shutdown").is_err());
    }

    #[test]
    fn test_demo_requirement_gates_admin() {
        let d = build_demo_dispatcher();
        let admin = Session {
            user: "root".to_string(),
            admin: true,
        };
        assert!(d.parse_execute(admin, "shutdown").is_ok());
    }

    #[test]
    fn test_demo_suggestions() {
        let d = build_demo_dispatcher();
        let parse = d.parse(Session::default(), "as ma");
        let suggestions = d.completion_suggestions(&parse).unwrap();
        let texts: Vec<_> = suggestions
            .suggestions
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(texts, vec!["mallory"]);
    }
}
