//! Records returned by the resource endpoints.
//!
//! Field names follow the backend's camelCase JSON. Optional fields are the
//! ones the backend may omit.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    OnLeave,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub date_of_birth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(default)]
    pub present_address: String,
    #[serde(default)]
    pub permanent_address: String,
    #[serde(default)]
    pub emergency_contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhaar_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uan_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub esic_number: Option<String>,
    pub date_of_joining: String,
    pub employment_type: String,
    pub department: String,
    pub designation: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_manager: Option<String>,
    #[serde(default)]
    pub work_location: String,
    #[serde(default)]
    pub shift_type: String,
    /// Months
    #[serde(default)]
    pub probation_period: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirmation_date: Option<String>,
    pub status: EmployeeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    HalfDay,
    OnLeave,
    Holiday,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: String,
    pub employee_id: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_time: Option<String>,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub shift: String,
    #[serde(default)]
    pub late_marks: u32,
    #[serde(default)]
    pub overtime: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leave {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub leave_type: String,
    pub from_date: String,
    pub to_date: String,
    pub days: f64,
    pub reason: String,
    pub status: LeaveStatus,
    pub applied_on: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    Draft,
    Processed,
    Paid,
}

/// One employee's pay for one month. Amounts are in rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payroll {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub month: String,
    pub year: i32,
    pub pay_days: f64,
    pub gross_salary: f64,
    pub basic_salary: f64,
    pub hra: f64,
    pub special_allowance: f64,
    pub conveyance: f64,
    pub medical_allowance: f64,
    pub other_allowances: f64,
    pub pf_employee: f64,
    pub pf_employer: f64,
    pub esic_employee: f64,
    pub esic_employer: f64,
    pub professional_tax: f64,
    pub tds: f64,
    pub total_deductions: f64,
    pub net_pay: f64,
    pub status: PayrollStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    Open,
    Closed,
    OnHold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub department: String,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub openings: u32,
    pub status: JobStatus,
    pub posted_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateStatus {
    New,
    Screening,
    Interview,
    Selected,
    Rejected,
    OnHold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub job_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume: Option<String>,
    pub status: CandidateStatus,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub expected_salary: f64,
    #[serde(default)]
    pub current_salary: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub employee_id: String,
    pub title: String,
    pub description: String,
    pub target_date: String,
    /// Percent of the appraisal score
    pub weightage: f64,
    pub status: GoalStatus,
    #[serde(default)]
    pub achievement: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppraisalStatus {
    Draft,
    Submitted,
    Reviewed,
    Finalized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appraisal {
    pub id: String,
    pub employee_id: String,
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_rating: Option<f64>,
    pub status: AppraisalStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelType {
    Local,
    Outstation,
    International,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequest {
    pub id: String,
    pub employee_id: String,
    pub purpose: String,
    pub destination: String,
    pub from_date: String,
    pub to_date: String,
    pub travel_type: TravelType,
    pub status: TravelStatus,
    #[serde(default)]
    pub advance_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub travel_request_id: String,
    pub category: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    pub status: ExpenseStatus,
}
