// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Server-rendered HTML pages.
//!
//! Pages are assembled from small string-building helpers. Validation
//! errors render as inline error lists next to the field they belong to;
//! non-field errors (failed login) render above the form.

use tradepost_domain::AccountRole;
use tradepost_forms::{FormErrors, LoginForm, SignupForm};
use tradepost_persistence::AccountData;

/// Pseudo-field key for errors that belong to the whole form.
pub const NON_FIELD: &str = "__all__";

/// The enumerated roles offered by the signup form, in display order.
const ROLE_CHOICES: [AccountRole; 3] = [
    AccountRole::Distributor,
    AccountRole::Retailer,
    AccountRole::Supplier,
];

/// Escapes a string for embedding in HTML text or attribute values.
pub fn escape(value: &str) -> String {
    let mut escaped: String = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Wraps page content in the shared layout.
fn page(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{} - Tradepost</title>\n\
         </head>\n\
         <body>\n\
         <header><a href=\"/\">Tradepost</a></header>\n\
         <main>\n{}</main>\n\
         </body>\n\
         </html>\n",
        escape(title),
        content
    )
}

/// Renders the error list for one field, or nothing if the field is clean.
fn field_errors(errors: &FormErrors, field: &str) -> String {
    let messages: Vec<&str> = errors.messages_for(field);
    if messages.is_empty() {
        return String::new();
    }

    let items: String = messages
        .iter()
        .map(|message| format!("<li>{}</li>", escape(message)))
        .collect();
    format!("<ul class=\"errorlist\">{items}</ul>")
}

/// Renders a labeled text-like input with its error list.
fn input_row(
    errors: &FormErrors,
    field: &str,
    label: &str,
    input_type: &str,
    value: &str,
) -> String {
    format!(
        "<p>\n{}<label for=\"id_{field}\">{}</label>\n\
         <input type=\"{input_type}\" name=\"{field}\" id=\"id_{field}\" value=\"{}\">\n</p>\n",
        field_errors(errors, field),
        escape(label),
        escape(value)
    )
}

/// Renders the signup page.
///
/// Submitted username and email values are retained on error; passwords
/// never are.
pub fn signup_page(form: &SignupForm, errors: &FormErrors) -> String {
    let username: &str = form.username.as_deref().unwrap_or("");
    let email: &str = form.email.as_deref().unwrap_or("");
    let selected_role: &str = form.role.as_deref().unwrap_or("");

    let options: String = ROLE_CHOICES
        .iter()
        .map(|role| {
            let selected: &str = if role.as_str() == selected_role {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{value}\"{selected}>{value}</option>",
                value = role.as_str()
            )
        })
        .collect();

    let content: String = format!(
        "<h1>Sign up</h1>\n\
         <form method=\"post\" action=\"/signup\">\n\
         {username_row}\
         {password1_row}\
         {password2_row}\
         {email_row}\
         <p>\n{type_errors}<label for=\"id_type\">Account type</label>\n\
         <select name=\"type\" id=\"id_type\">\n\
         <option value=\"\">---------</option>\n{options}\n</select>\n</p>\n\
         <button type=\"submit\">Sign up</button>\n\
         </form>\n",
        username_row = input_row(errors, "username", "Username", "text", username),
        password1_row = input_row(errors, "password1", "Password", "password", ""),
        password2_row = input_row(errors, "password2", "Password confirmation", "password", ""),
        email_row = input_row(errors, "email", "Email address", "email", email),
        type_errors = field_errors(errors, "type"),
    );

    page("Sign up", &content)
}

/// Renders the login page.
///
/// A failed credential check renders as a non-field error above the form.
pub fn login_page(form: &LoginForm, errors: &FormErrors) -> String {
    let username: &str = form.username.as_deref().unwrap_or("");

    let content: String = format!(
        "<h1>Log in</h1>\n\
         {non_field}\
         <form method=\"post\" action=\"/login\">\n\
         {username_row}\
         {password_row}\
         <button type=\"submit\">Log in</button>\n\
         </form>\n",
        non_field = field_errors(errors, NON_FIELD),
        username_row = input_row(errors, "username", "Username", "text", username),
        password_row = input_row(errors, "password", "Password", "password", ""),
    );

    page("Log in", &content)
}

/// Renders the change-password page.
///
/// On success the form is replaced by the confirmation message.
pub fn change_password_page(errors: &FormErrors, success: Option<&str>) -> String {
    let content: String = success.map_or_else(
        || {
            format!(
                "<h1>Change password</h1>\n\
                 <form method=\"post\" action=\"/change_password\">\n\
                 {password1_row}\
                 {password2_row}\
                 <button type=\"submit\">Change password</button>\n\
                 </form>\n",
                password1_row =
                    input_row(errors, "new_password1", "New password", "password", ""),
                password2_row = input_row(
                    errors,
                    "new_password2",
                    "New password confirmation",
                    "password",
                    ""
                ),
            )
        },
        |message| format!("<h1>Change password</h1>\n<p>{}</p>\n", escape(message)),
    );

    page("Change password", &content)
}

/// Renders the password-reset request page.
///
/// The instruction text mentions checking email on both the form and the
/// confirmation variant.
pub fn request_password_page(errors: &FormErrors, issued: bool) -> String {
    let content: String = if issued {
        String::from(
            "<h1>Reset your password</h1>\n\
             <p>Check your email for password reset instructions.</p>\n",
        )
    } else {
        format!(
            "<h1>Reset your password</h1>\n\
             <p>Enter the email address on your account and we will send reset \
             instructions. Check your email afterwards.</p>\n\
             <form method=\"post\" action=\"/request_password\">\n\
             {email_row}\
             <button type=\"submit\">Send reset email</button>\n\
             </form>\n",
            email_row = input_row(errors, "email", "Email address", "email", ""),
        )
    };

    page("Reset your password", &content)
}

/// Renders the homepage.
pub fn homepage(account: Option<&AccountData>) -> String {
    let content: String = account.map_or_else(
        || {
            String::from(
                "<h1>Welcome to Tradepost</h1>\n\
                 <p><a href=\"/login\">Log in</a> or <a href=\"/signup\">sign up</a>.</p>\n",
            )
        },
        |account| {
            format!(
                "<h1>Welcome to Tradepost</h1>\n\
                 <p>Signed in as {username} ({role}).</p>\n\
                 <ul>\n\
                 <li><a href=\"/change_password\">Change password</a></li>\n\
                 <li><a href=\"/request_password\">Reset password</a></li>\n\
                 </ul>\n\
                 <form method=\"post\" action=\"/logout\">\
                 <button type=\"submit\">Log out</button></form>\n",
                username = escape(&account.username),
                role = escape(&account.role),
            )
        },
    );

    page("Home", &content)
}

/// Renders a minimal error page.
pub fn error_page(message: &str) -> String {
    page("Error", &format!("<h1>Something went wrong</h1>\n<p>{}</p>\n", escape(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_covers_html_significant_characters() {
        assert_eq!(
            escape("didn't <match> \"x\" & y"),
            "didn&#x27;t &lt;match&gt; &quot;x&quot; &amp; y"
        );
    }

    #[test]
    fn test_field_errors_render_as_errorlist() {
        let mut errors: FormErrors = FormErrors::new();
        errors.add("username", "This field is required.");

        let html: String = field_errors(&errors, "username");

        assert_eq!(
            html,
            "<ul class=\"errorlist\"><li>This field is required.</li></ul>"
        );
        assert!(field_errors(&errors, "email").is_empty());
    }

    #[test]
    fn test_signup_page_retains_values_but_not_passwords() {
        let form: SignupForm = SignupForm {
            username: Some(String::from("testuser")),
            password1: Some(String::from("secretvalue")),
            password2: Some(String::from("secretvalue")),
            email: Some(String::from("test@example.com")),
            role: Some(String::from("distributor")),
        };
        let html: String = signup_page(&form, &FormErrors::new());

        assert!(html.contains("value=\"testuser\""));
        assert!(html.contains("value=\"test@example.com\""));
        assert!(html.contains("<option value=\"distributor\" selected>"));
        assert!(!html.contains("secretvalue"));
    }

    #[test]
    fn test_error_messages_are_escaped() {
        let mut errors: FormErrors = FormErrors::new();
        errors.add("new_password2", "The two password fields didn't match.");

        let html: String = change_password_page(&errors, None);

        assert!(html.contains("The two password fields didn&#x27;t match."));
    }

    #[test]
    fn test_request_password_page_mentions_email_both_ways() {
        assert!(request_password_page(&FormErrors::new(), false).contains("Check your email"));
        assert!(request_password_page(&FormErrors::new(), true).contains("Check your email"));
    }
}
