//! Static control-file templates, one per init flavor.
//!
//! Each template carries three placeholders, `{{display}}`,
//! `{{description}}` and `{{path}}`, filled from a [`ServiceConfigRecord`].
//! Rendering is plain substitution; any other `{{...}}` sequence is copied
//! through untouched.

use crate::flavor::InitFlavor;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Values substituted into a control-file template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfigRecord {
    /// Human-readable service label.
    pub display: String,
    /// Free-text description.
    pub description: String,
    /// Absolute path of the executable the init system launches.
    pub path: String,
}

/// Names recognised inside `{{...}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `{{display}}`
    Display,
    /// `{{description}}`
    Description,
    /// `{{path}}`
    Path,
}

impl Placeholder {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "display" => Some(Self::Display),
            "description" => Some(Self::Description),
            "path" => Some(Self::Path),
            _ => None,
        }
    }

    fn value(self, record: &ServiceConfigRecord) -> &str {
        match self {
            Self::Display => &record.display,
            Self::Description => &record.description,
            Self::Path => &record.path,
        }
    }
}

/// A flavor's control-file template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptTemplate {
    name: &'static str,
    source: &'static str,
}

impl ScriptTemplate {
    /// Template identifier used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Raw template text.
    #[must_use]
    pub const fn source(&self) -> &'static str {
        self.source
    }

    /// Substitutes `record` into the template.
    #[must_use]
    pub fn render(&self, record: &ServiceConfigRecord) -> String {
        let mut rendered = String::with_capacity(self.source.len() + 256);
        let mut rest = self.source;
        while let Some((before, after)) = rest.split_once(OPEN) {
            rendered.push_str(before);
            let Some((name, tail)) = after.split_once(CLOSE) else {
                rendered.push_str(OPEN);
                rest = after;
                continue;
            };
            match Placeholder::parse(name) {
                Some(placeholder) => rendered.push_str(placeholder.value(record)),
                None => {
                    rendered.push_str(OPEN);
                    rendered.push_str(name);
                    rendered.push_str(CLOSE);
                }
            }
            rest = tail;
        }
        rendered.push_str(rest);
        rendered
    }

    /// Every `{{...}}` name in the template, recognised or not.
    #[must_use]
    pub fn placeholder_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.source;
        while let Some((_, after)) = rest.split_once(OPEN) {
            let Some((name, tail)) = after.split_once(CLOSE) else {
                break;
            };
            names.push(name);
            rest = tail;
        }
        names
    }

    /// Whether every placeholder in the template is one of the three known
    /// names.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.placeholder_names()
            .into_iter()
            .all(|name| Placeholder::parse(name).is_some())
    }
}

impl InitFlavor {
    /// Template for this flavor's control file.
    #[must_use]
    pub const fn template(self) -> ScriptTemplate {
        match self {
            Self::Systemd => SYSTEMD_TEMPLATE,
            Self::SystemV => SYSTEM_V_TEMPLATE,
            Self::Upstart => UPSTART_TEMPLATE,
        }
    }
}

/// Free-function form of [`InitFlavor::template`].
#[must_use]
pub const fn template(flavor: InitFlavor) -> ScriptTemplate {
    flavor.template()
}

/// Unit file written to `/etc/systemd/system/<name>.service`.
pub const SYSTEMD_TEMPLATE: ScriptTemplate = ScriptTemplate {
    name: "systemd",
    source: r##"[Unit]
Description={{description}}
ConditionFileIsExecutable={{path}}

[Service]
StartLimitInterval=5
StartLimitBurst=10
ExecStart={{path}}

[Install]
WantedBy=multi-user.target
"##,
};

/// Job definition written to `/etc/init/<name>.conf`.
pub const UPSTART_TEMPLATE: ScriptTemplate = ScriptTemplate {
    name: "upstart",
    source: r##"# {{description}}

description     "{{display}}"

start on filesystem or runlevel [2345]
stop on runlevel [!2345]

#setuid username

respawn
respawn limit 10 5
umask 022

console none

pre-start script
    test -x {{path}} || { stop; exit 0; }
end script

# Start
exec {{path}}
"##,
};

/// Init script written to `/etc/init.d/<name>`.
pub const SYSTEM_V_TEMPLATE: ScriptTemplate = ScriptTemplate {
    name: "system-v",
    source: r##"#!/bin/sh
# For RedHat and cousins:
# chkconfig: - 99 01
# description: {{description}}
# processname: {{path}}

### BEGIN INIT INFO
# Provides:          {{path}}
# Required-Start:
# Required-Stop:
# Default-Start:     2 3 4 5
# Default-Stop:      0 1 6
# Short-Description: {{display}}
# Description:       {{description}}
### END INIT INFO

cmd="{{path}}"

name=$(basename $0)
pid_file="/var/run/$name.pid"
stdout_log="/var/log/$name.log"
stderr_log="/var/log/$name.err"

get_pid() {
    cat "$pid_file"
}

is_running() {
    [ -f "$pid_file" ] && ps $(get_pid) > /dev/null 2>&1
}

case "$1" in
    start)
        if is_running; then
            echo "Already started"
        else
            echo "Starting $name"
            $cmd >> "$stdout_log" 2>> "$stderr_log" &
            echo $! > "$pid_file"
            if ! is_running; then
                echo "Unable to start, see $stdout_log and $stderr_log"
                exit 1
            fi
        fi
    ;;
    stop)
        if is_running; then
            echo -n "Stopping $name.."
            kill $(get_pid)
            for i in {1..10}
            do
                if ! is_running; then
                    break
                fi
                echo -n "."
                sleep 1
            done
            echo
            if is_running; then
                echo "Not stopped; may still be shutting down or shutdown may have failed"
                exit 1
            else
                echo "Stopped"
                if [ -f "$pid_file" ]; then
                    rm "$pid_file"
                fi
            fi
        else
            echo "Not running"
        fi
    ;;
    restart)
        $0 stop
        if is_running; then
            echo "Unable to stop, will not attempt to start"
            exit 1
        fi
        $0 start
    ;;
    status)
        if is_running; then
            echo "Running"
        else
            echo "Stopped"
            exit 1
        fi
    ;;
    *)
    echo "Usage: $0 {start|stop|restart|status}"
    exit 1
    ;;
esac
exit 0"##,
};
