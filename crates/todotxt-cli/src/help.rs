pub const LONG_HELP: &str = "
Built-in Actions:

  add \"THING I NEED TO DO +project @context\"
  a \"THING I NEED TO DO +project @context\"
    Adds THING I NEED TO DO to your todo.txt file on its own line.
    Project and context notation optional.

  archive
    Moves all done tasks (starting with x) from todo.txt to done.txt.
    Archived tasks no longer appear in the todo list.

  depri ITEM#[, ITEM#, ITEM#, ...]
  dp ITEM#[, ITEM#, ITEM#, ...]
    Removes the priority from the task(s) on line ITEM# in todo.txt.

  do ITEM#[, ITEM#, ITEM#, ...]
    Marks task(s) on line ITEM# as done in todo.txt.

  del ITEM#[, ITEM#, ITEM#, ...]
  rm ITEM#[, ITEM#, ITEM#, ...]
    Deletes the task(s) on line ITEM# in todo.txt.

  help
    Displays this help message. Use -h/--help for options and the
    short listing of actions.

  list [TERM...]
  ls [TERM...]
    Displays all tasks that contain TERM(s), sorted, with line numbers.
    Each task must match all TERM(s) as whole words (logical AND).
    If no TERM is given, lists the entire todo.txt.

  pri ITEM# PRIORITY
  p ITEM# PRIORITY
    Adds PRIORITY to the task on line ITEM#. If the task already has a
    priority it is replaced. PRIORITY must be a letter between A and Z.

  shorthelp
    Lists the one-line usage of all built-in actions.
";

pub const SHORT_HELP: &str = "Actions:
  add|a \"THING I NEED TO DO +project @context\"
  archive
  del|rm ITEM#[, ITEM#, ITEM#, ...]
  depri|dp ITEM#[, ITEM#, ITEM#, ...]
  do ITEM#[, ITEM#, ITEM#, ...]
  help
  list|ls [TERM...]
  pri|p ITEM# PRIORITY
  shorthelp
";
